//! Gemini REST ゲートウェイ（ネイティブ）

use std::time::Duration;

use async_trait::async_trait;
use culina_common::gemini::{build_analysis_request, endpoint_url, parse_response_body, GEMINI_API_BASE};
use culina_common::{AnalysisResult, DietaryFilter, Error, ImageData, RecipeGateway, Result};

pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout: None,
        }
    }

    /// テストやプロキシ用にAPIのベースURLを差し替える
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait(?Send)]
impl RecipeGateway for GeminiGateway {
    async fn analyze(&self, image: &ImageData, filter: DietaryFilter) -> Result<AnalysisResult> {
        let request = build_analysis_request(image, filter);
        let url = endpoint_url(&self.base_url, &self.model);

        tracing::debug!(
            model = %self.model,
            filter = filter.as_str(),
            image_bytes = image.bytes.len(),
            "sending analysis request"
        );

        let mut builder = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Gateway(format!("failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            tracing::warn!(%status, "gemini api returned an error status");
            return Err(Error::Gateway(format!("HTTP {}: {}", status, truncate(&body, 200))));
        }

        parse_response_body(&body)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("冷蔵庫の中身", 3), "冷蔵庫...");
    }

    #[test]
    fn test_builder() {
        let gateway = GeminiGateway::new("k", "gemini-test")
            .with_base_url("http://localhost:1")
            .with_timeout(Some(Duration::from_secs(5)));
        assert_eq!(gateway.model, "gemini-test");
        assert_eq!(gateway.base_url, "http://localhost:1");
        assert_eq!(gateway.timeout, Some(Duration::from_secs(5)));
    }
}
