use crate::error::{CulinaError, Result};
use culina_common::gemini::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIキーを探す環境変数（先頭が優先）
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    /// 送信前に縮小する長辺のピクセル数
    pub max_image_size: u32,
    /// 未設定ならタイムアウトなし
    pub timeout_seconds: Option<u64>,
    /// 読み上げコマンド（未設定なら say / espeak-ng / espeak を自動検出）
    pub speech_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            max_image_size: 1568,
            timeout_seconds: None,
            speech_command: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CulinaError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("culina-vision").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    /// 環境変数を優先し、無ければ設定ファイルの値
    pub fn resolve_api_key<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .chain(self.api_key.clone())
            .find(|key| !key.trim().is_empty())
            .ok_or(CulinaError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }
}
