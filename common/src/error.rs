//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Analysis already in progress")]
    AnalysisInProgress,

    #[error("Speech error: {0}")]
    Speech(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        let display = format!("{}", error);
        assert!(display.contains("JSON error"));
    }

    #[test]
    fn test_error_display_schema() {
        let error = Error::Schema("recipes[0].id が空です".to_string());
        assert_eq!(format!("{}", error), "Schema error: recipes[0].id が空です");
    }

    #[test]
    fn test_error_display_unit_variants() {
        assert_eq!(format!("{}", Error::EmptyResponse), "Empty response from model");
        assert_eq!(format!("{}", Error::AnalysisInProgress), "Analysis already in progress");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Gateway("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Gateway"));
        assert!(debug.contains("テスト"));
    }
}
