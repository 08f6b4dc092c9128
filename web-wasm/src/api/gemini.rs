//! Gemini API連携（ブラウザfetch）

use async_trait::async_trait;
use culina_common::gemini::{build_analysis_request, endpoint_url, parse_response_body, GEMINI_API_BASE, DEFAULT_MODEL};
use culina_common::{AnalysisResult, DietaryFilter, Error, ImageData, RecipeGateway, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ビルド時に埋め込まれたAPIキー
pub fn build_time_api_key() -> Option<&'static str> {
    option_env!("GEMINI_API_KEY").filter(|key| !key.trim().is_empty())
}

/// キー付きのリクエストURL
pub fn request_url(api_key: &str, model: &str) -> String {
    format!("{}?key={}", endpoint_url(GEMINI_API_BASE, model), api_key)
}

fn js_error(context: &str, value: JsValue) -> Error {
    Error::Gateway(format!("{}: {:?}", context, value))
}

pub struct GeminiWebGateway {
    api_key: String,
    model: String,
}

impl GeminiWebGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    async fn post(&self, body: &str) -> Result<String> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(body));

        let url = request_url(&self.api_key, &self.model);
        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| js_error("request", e))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| js_error("headers", e))?;

        let window = web_sys::window().ok_or_else(|| Error::Gateway("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("fetch", e))?;
        let resp: Response = resp_value.dyn_into().map_err(|e| js_error("response", e))?;

        let text_promise = resp.text().map_err(|e| js_error("body", e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| js_error("body", e))?
            .as_string()
            .unwrap_or_default();

        if !resp.ok() {
            return Err(Error::Gateway(format!("API error: {}", resp.status())));
        }
        Ok(text)
    }
}

#[async_trait(?Send)]
impl RecipeGateway for GeminiWebGateway {
    async fn analyze(&self, image: &ImageData, filter: DietaryFilter) -> Result<AnalysisResult> {
        let request = build_analysis_request(image, filter);
        let body = serde_json::to_string(&request)?;
        let text = self.post(&body).await?;
        parse_response_body(&text)
    }
}
