//! Gemini generateContent のワイヤ型
//!
//! ネイティブ(reqwest)とWeb(fetch)の両ゲートウェイが同じリクエスト/レスポンス型を使う。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::parser::parse_analysis_response;
use crate::prompts::{build_analysis_prompt, response_schema};
use crate::types::{AnalysisResult, DietaryFilter, ImageData};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// generateContent エンドポイントURL（APIキーなし）
pub fn endpoint_url(base: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", base.trim_end_matches('/'), model)
}

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeminiResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponseContent {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストパートを連結して返す
    pub fn text(&self) -> Result<String> {
        let candidate = self.candidates.first().ok_or(Error::EmptyResponse)?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            if let Some(reason) = &candidate.finish_reason {
                tracing::warn!(finish_reason = %reason, "candidate has no text");
            }
            return Err(Error::EmptyResponse);
        }
        Ok(text)
    }
}

/// 解析リクエスト作成（画像 → 指示文の順）
pub fn build_analysis_request(image: &ImageData, filter: DietaryFilter) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.to_base64(),
                    },
                },
                Part::Text {
                    text: build_analysis_prompt(filter),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

/// HTTPレスポンス本文から解析結果を取り出す
pub fn parse_response_body(body: &str) -> Result<AnalysisResult> {
    let response: GeminiResponse = serde_json::from_str(body)?;
    let text = response.text()?;
    parse_analysis_response(&text)
}
