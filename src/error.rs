use thiserror::Error;

#[derive(Error, Debug)]
pub enum CulinaError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`culina config --set-api-key YOUR_KEY` で設定するか GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("対応していない画像形式です: {0}")]
    UnsupportedImage(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] culina_common::Error),
}

impl From<dialoguer::Error> for CulinaError {
    fn from(e: dialoguer::Error) -> Self {
        CulinaError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CulinaError>;
