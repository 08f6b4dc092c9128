//! Gemini ゲートウェイのHTTPテスト
//!
//! wiremockでgenerateContentを模擬し、リクエスト形式とエラー変換を検証

use culina_common::{DietaryFilter, Error, ImageData, RecipeGateway};
use culina_vision::gateway::GeminiGateway;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const ENDPOINT: &str = "/models/gemini-test:generateContent";

fn recipe(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Recipe {}", id),
        "description": "Quick and tasty",
        "difficulty": "Easy",
        "prepTime": "15 min",
        "calories": 320,
        "ingredients": ["egg", "spinach"],
        "missingIngredients": ["feta"],
        "steps": ["Whisk eggs", "Wilt spinach", "Combine"],
        "tags": ["Vegetarian"]
    })
}

fn analysis(recipes: Vec<Value>) -> Value {
    json!({
        "identifiedIngredients": ["egg", "spinach", "milk"],
        "recipes": recipes
    })
}

fn gemini_body(inner: &Value) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": inner.to_string() }] },
            "finishReason": "STOP"
        }]
    })
}

fn image() -> ImageData {
    ImageData::new("image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
}

fn gateway(server: &MockServer) -> GeminiGateway {
    GeminiGateway::new("test-key", MODEL).with_base_url(server.uri())
}

#[tokio::test]
async fn test_analyze_success() {
    let server = MockServer::start().await;
    let recipes = ["r1", "r2", "r3", "r4", "r5"].iter().map(|id| recipe(id)).collect();

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&analysis(recipes))))
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway(&server)
        .analyze(&image(), DietaryFilter::Vegetarian)
        .await
        .unwrap();

    assert_eq!(result.identified_ingredients, vec!["egg", "spinach", "milk"]);
    assert_eq!(result.recipes.len(), 5);
    assert_eq!(result.recipes[0].missing_ingredients, vec!["feta"]);
    assert_eq!(result.recipes[4].id, "r5");
}

#[tokio::test]
async fn test_request_carries_image_then_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&analysis(vec![recipe("r1")]))))
        .mount(&server)
        .await;

    gateway(&server)
        .analyze(&image(), DietaryFilter::Keto)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inline_data"]["mime_type"], "image/jpeg");
    assert_eq!(parts[0]["inline_data"]["data"], "/9j/4A==");
    assert!(parts[1]["text"].as_str().unwrap().contains("Keto"));
    assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
}

#[tokio::test]
async fn test_fewer_recipes_are_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&analysis(vec![recipe("only")]))))
        .mount(&server)
        .await;

    let result = gateway(&server)
        .analyze(&image(), DietaryFilter::None)
        .await
        .unwrap();
    assert_eq!(result.recipes.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .analyze(&image(), DietaryFilter::None)
        .await
        .unwrap_err();
    match err {
        Error::Gateway(message) => assert!(message.contains("500")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .analyze(&image(), DietaryFilter::None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_missing_required_field_is_rejected() {
    let server = MockServer::start().await;
    let mut broken = recipe("r1");
    broken.as_object_mut().unwrap().remove("steps");

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&analysis(vec![broken]))))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .analyze(&image(), DietaryFilter::None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[tokio::test]
async fn test_empty_steps_is_schema_error() {
    let server = MockServer::start().await;
    let mut broken = recipe("r1");
    broken["steps"] = json!([]);

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&analysis(vec![broken]))))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .analyze(&image(), DietaryFilter::None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_gateway_error() {
    let err = GeminiGateway::new("test-key", MODEL)
        .with_base_url("http://127.0.0.1:1")
        .analyze(&image(), DietaryFilter::None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Gateway(_)));
}
