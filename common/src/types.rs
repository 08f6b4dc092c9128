//! レシピ・解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Recipe: AIが提案した1件のレシピ
//! - AnalysisResult: 1回の解析で得られる食材とレシピ一覧
//! - DietaryFilter: 食事制限の選択肢
//! - ViewState: 画面状態
//! - ImageData: 解析に送る画像

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// 難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AIが提案したレシピ
///
/// 全フィールド必須。欠落はデシリアライズ時点でエラーにする。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub prep_time: String,
    pub calories: u32,
    /// 冷蔵庫にある食材
    pub ingredients: Vec<String>,
    /// 足りない食材
    pub missing_ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
}

impl Recipe {
    pub fn has_all_ingredients(&self) -> bool {
        self.missing_ingredients.is_empty()
    }

    /// 不足食材の先頭 `limit` 件と、残りの件数
    pub fn missing_preview(&self, limit: usize) -> (&[String], usize) {
        let shown = limit.min(self.missing_ingredients.len());
        (
            &self.missing_ingredients[..shown],
            self.missing_ingredients.len() - shown,
        )
    }
}

/// 1回の解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub identified_ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
}

/// 食事制限フィルタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietaryFilter {
    #[default]
    None,
    Vegetarian,
    Vegan,
    Keto,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    Paleo,
}

impl DietaryFilter {
    pub const ALL: [DietaryFilter; 6] = [
        DietaryFilter::None,
        DietaryFilter::Vegetarian,
        DietaryFilter::Vegan,
        DietaryFilter::Keto,
        DietaryFilter::GlutenFree,
        DietaryFilter::Paleo,
    ];

    /// プロンプトに埋め込む表記
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryFilter::None => "None",
            DietaryFilter::Vegetarian => "Vegetarian",
            DietaryFilter::Vegan => "Vegan",
            DietaryFilter::Keto => "Keto",
            DietaryFilter::GlutenFree => "Gluten-Free",
            DietaryFilter::Paleo => "Paleo",
        }
    }

    /// サイドバー表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            DietaryFilter::None => "No Restrictions",
            other => other.as_str(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        !matches!(self, DietaryFilter::None)
    }
}

impl fmt::Display for DietaryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "no" | "any" => Ok(DietaryFilter::None),
            "vegetarian" | "veg" => Ok(DietaryFilter::Vegetarian),
            "vegan" => Ok(DietaryFilter::Vegan),
            "keto" => Ok(DietaryFilter::Keto),
            "gluten-free" | "glutenfree" | "gluten_free" | "gf" => Ok(DietaryFilter::GlutenFree),
            "paleo" => Ok(DietaryFilter::Paleo),
            _ => Err(format!(
                "Unknown diet: {}. Use none, vegetarian, vegan, keto, gluten-free, or paleo",
                s
            )),
        }
    }
}

/// 画面状態
///
/// 解析中の表示は `AppController::is_analyzing` で行うため、専用の状態は持たない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewState {
    #[default]
    Upload,
    Recipes,
    Cooking,
    Shopping,
}

impl ViewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewState::Upload => "upload",
            ViewState::Recipes => "recipes",
            ViewState::Cooking => "cooking",
            ViewState::Shopping => "shopping",
        }
    }

    /// ルート名から画面を決定（不明な値はアップロード画面）
    pub fn from_route(route: &str) -> Self {
        route
            .trim_start_matches('#')
            .parse()
            .unwrap_or(ViewState::Upload)
    }
}

impl FromStr for ViewState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "upload" => Ok(ViewState::Upload),
            "recipes" => Ok(ViewState::Recipes),
            "cooking" => Ok(ViewState::Cooking),
            "shopping" => Ok(ViewState::Shopping),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

/// 解析対象の画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Data URL ("data:image/jpeg;base64,...") から生成
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let payload = extract_base64_from_data_url(data_url)
            .ok_or_else(|| Error::Parse("Invalid data URL".into()))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| Error::Parse(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self::new(extract_mime_type_from_data_url(data_url), bytes))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出（不正な形式は "image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}
