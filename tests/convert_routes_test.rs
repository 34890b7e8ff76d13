//! Integration tests for web routes.
//!
//! These exercise the real router through `tower::ServiceExt::oneshot`. Paths
//! that reject before a browser launches (validation, method, CORS) run
//! without any Chromium installed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use chatgpt_share_pdf::config::Config;
use chatgpt_share_pdf::web::{create_app, AppState};

fn test_app() -> Router {
    let config = Config::from_env().expect("Failed to create config");
    create_app(AppState {
        config: Arc::new(config),
    })
}

fn post_convert(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body was not UTF-8")
}

#[tokio::test]
async fn wrong_host_is_rejected_without_launching_a_browser() {
    let app = test_app();

    let response = app
        .oneshot(post_convert(r#"{"url": "https://evil.com/share/abc123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    let envelope: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(envelope["ok"], false);
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .contains("invalid share link"));
}

#[tokio::test]
async fn wrong_path_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(post_convert(r#"{"url": "https://chatgpt.com/c/abc123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_url_is_a_client_error() {
    let app = test_app();

    let response = app
        .oneshot(post_convert(r#"{"format": "A4"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    let envelope: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(envelope["ok"], false);
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let app = test_app();

    let response = app.oneshot(post_convert("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_convert_is_method_not_allowed() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/convert")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn plain_options_returns_no_content() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/convert")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn cors_preflight_reflects_origin() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/convert")
                .header(header::ORIGIN, "https://frontend.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://frontend.example")
    );
}

#[tokio::test]
async fn healthz_is_ok() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
#[ignore = "requires a local Chromium and network access"]
async fn end_to_end_share_conversion_produces_a_pdf() {
    let app = test_app();

    let response = app
        .oneshot(post_convert(
            r#"{"url": "https://chatgpt.com/share/abc123", "forceRaster": true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"chatgpt-conversation.pdf\"")
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
