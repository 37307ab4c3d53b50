//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use waymark_api::build_router;
use waymark_api::state::AppState;
use waymark_core::position::SessionPositionStore;
use waymark_store::StaticAdventureLoader;
use waymark_store::file_loader::{AdventureFormat, parse_adventure};

/// Media base every test app resolves audio against.
pub const MEDIA_BASE_URL: &str = "https://cdn.test/lighthouse";

/// Build the full app router over the bundled lighthouse adventure and the
/// given position store. Uses the same route structure as `main.rs`.
pub fn build_test_app(store: Arc<dyn SessionPositionStore>) -> Router {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../adventures/lighthouse.yaml");
    let source = std::fs::read_to_string(path).unwrap();
    let adventure = parse_adventure(&source, AdventureFormat::Yaml).unwrap();

    build_router(AppState::new(
        Arc::new(StaticAdventureLoader::new(adventure)),
        store,
        MEDIA_BASE_URL,
    ))
}

/// A launch envelope for `user_id`.
pub fn launch(user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "session": { "sessionId": "sess-1", "user": { "userId": user_id } },
        "request": { "type": "LaunchRequest" }
    })
}

/// An intent envelope for `user_id`.
pub fn intent(user_id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "session": { "sessionId": "sess-1", "user": { "userId": user_id } },
        "request": { "type": "IntentRequest", "intent": { "name": name } }
    })
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Returns the SSML (or plain text) the response speaks.
pub fn speech(json: &serde_json::Value) -> String {
    let speech = &json["response"]["outputSpeech"];
    speech["ssml"]
        .as_str()
        .or_else(|| speech["text"].as_str())
        .unwrap_or_default()
        .to_owned()
}
