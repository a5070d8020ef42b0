mod common;

use axum::{Json, Router, extract::Path, http::HeaderMap, routing::post};
use common::{StubGenerator, gemini_reply, spawn};
use reqwest::Client;
use serde_json::{Value, json};
use tasteroast::{
    config::GeminiConfig,
    error::RoastError,
    roast::generate::{
        Extraction, FALLBACK_ROAST, GeminiClient, TextGenerator, extract_text, generate_roast,
    },
};

#[test]
fn test_extracts_known_shapes() {
    assert_eq!(
        extract_text(json!({ "text": "direct" })),
        Extraction::Recognized("direct".into())
    );
    assert_eq!(
        extract_text(json!({ "response": { "text": "nested" } })),
        Extraction::Recognized("nested".into())
    );
    assert_eq!(
        extract_text(json!({ "response": { "text": { "text": "accessor" } } })),
        Extraction::Recognized("accessor".into())
    );
    assert_eq!(
        extract_text(gemini_reply("candidate")),
        Extraction::Recognized("candidate".into())
    );
}

#[test]
fn test_first_matching_shape_wins() {
    let raw = json!({
        "text": "top level",
        "candidates": [{ "content": { "parts": [{ "text": "candidate" }] } }]
    });
    assert_eq!(extract_text(raw), Extraction::Recognized("top level".into()));
}

#[test]
fn test_blank_text_falls_through() {
    let raw = json!({
        "text": "   ",
        "candidates": [{ "content": { "parts": [{ "text": "candidate" }] } }]
    });
    assert_eq!(extract_text(raw), Extraction::Recognized("candidate".into()));

    let blank = json!({ "text": "" });
    assert_eq!(extract_text(blank.clone()), Extraction::Unrecognized(blank));
}

#[test]
fn test_unknown_shapes_are_unrecognized() {
    for raw in [
        json!({}),
        json!({ "text": 42 }),
        json!({ "candidates": [] }),
        json!({ "candidates": [{ "content": { "parts": [] } }] }),
        json!("just a string"),
    ] {
        assert_eq!(extract_text(raw.clone()), Extraction::Unrecognized(raw));
    }
}

#[tokio::test]
async fn test_generate_roast_reports_degradation() {
    let ok = StubGenerator::replying(gemini_reply("Kya bakwaas sunta hai tu"));
    assert_eq!(
        generate_roast(ok.as_ref(), "prompt").await,
        ("Kya bakwaas sunta hai tu".to_string(), false)
    );

    let odd = StubGenerator::replying(json!({ "output": "?" }));
    assert_eq!(
        generate_roast(odd.as_ref(), "prompt").await,
        (FALLBACK_ROAST.to_string(), true)
    );

    let down = StubGenerator::failing(RoastError::GenerationDegraded("timeout".into()));
    assert_eq!(
        generate_roast(down.as_ref(), "prompt").await,
        (FALLBACK_ROAST.to_string(), true)
    );
}

async fn fake_gemini(
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    Json(gemini_reply(&format!("{model}|{key}|{prompt}")))
}

#[tokio::test]
async fn test_gemini_client_request_shape() {
    let base = spawn(Router::new().route("/models/{model}", post(fake_gemini))).await;
    let client = GeminiClient::new(
        Client::new(),
        &GeminiConfig {
            api_key: "secret-key".into(),
            model: "gemini-test".into(),
            api_url: base,
        },
    );

    let raw = client.generate("roast me").await.unwrap();

    assert_eq!(
        extract_text(raw),
        Extraction::Recognized("gemini-test:generateContent|secret-key|roast me".into())
    );
}

#[tokio::test]
async fn test_gemini_client_error_status_is_degraded() {
    let base = spawn(Router::new()).await;
    let client = GeminiClient::new(
        Client::new(),
        &GeminiConfig {
            api_key: "k".into(),
            model: "m".into(),
            api_url: base,
        },
    );

    assert!(matches!(
        client.generate("roast me").await,
        Err(RoastError::GenerationDegraded(_))
    ));
}
