//! Functional tests for the HTTP API in forced placeholder mode

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use concrete_vision::{
    api::routes::create_router, config::Settings, generator::Generator, AppState,
};

async fn create_test_app() -> Router {
    let mut settings = Settings::default();
    settings.generator.placeholder_mode = true;

    let generator = Arc::new(Generator::initialize(&settings.generator).await);
    create_router(Arc::new(AppState::new(settings, generator)))
}

fn generate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_generate_returns_base64_png() {
    let app = create_test_app().await;

    let response = app
        .oneshot(generate_request(r#"{"prompt": "a red barn at sunset"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let encoded = body["image"].as_str().expect("image field");

    let png = concrete_vision::response::base64::decode(encoded).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.into_rgb8().dimensions(), (512, 512));
}

#[tokio::test]
async fn test_missing_prompt_returns_400_with_exact_body() {
    let app = create_test_app().await;

    let response = app.oneshot(generate_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Prompt is required"})
    );
}

#[tokio::test]
async fn test_empty_prompt_returns_400() {
    let app = create_test_app().await;

    let response = app
        .oneshot(generate_request(r#"{"prompt": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Prompt is required"})
    );
}

#[tokio::test]
async fn test_whitespace_prompt_returns_400() {
    let app = create_test_app().await;

    let response = app
        .oneshot(generate_request(r#"{"prompt": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_returns_400() {
    let app = create_test_app().await;

    let response = app.oneshot(generate_request("not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Prompt is required"})
    );
}

#[tokio::test]
async fn test_placeholder_output_is_idempotent() {
    let app = create_test_app().await;

    let first = app
        .clone()
        .oneshot(generate_request(r#"{"prompt": "same prompt"}"#))
        .await
        .unwrap();
    let second = app
        .oneshot(generate_request(r#"{"prompt": "same prompt"}"#))
        .await
        .unwrap();

    let first = body_json(first).await;
    let second = body_json(second).await;
    assert_eq!(first["image"], second["image"]);
}

#[tokio::test]
async fn test_health_reports_placeholder_mode() {
    let app = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["generator"]["model_loaded"], false);
    assert_eq!(body["generator"]["placeholder_mode"], true);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/generate")
                .header(header::ORIGIN, "https://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
