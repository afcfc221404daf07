// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP endpoint tests for POST /v1/embed and GET /health.
//!
//! The model-free tests drive the router with `tower::ServiceExt::oneshot`
//! and cover every 4xx path plus the not-ready surface. Tests marked
//! `#[ignore]` need the real model artifacts under `model/` and exercise
//! the full 200 path end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use embedding_service::runtime::local::{create_app, AppState};
use embedding_service::{Config, EmbedResponse, ErrorResponse, ModelContext, VALID_DIMENSIONS};
use tower::ServiceExt; // for `oneshot`

/// Builds a POST /v1/embed request with the given JSON body
fn embed_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/embed")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request construction cannot fail")
}

async fn response_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read cannot fail");
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Test state with the real model, shared across the process like a warm
/// Lambda environment
async fn ready_state() -> AppState {
    let context = ModelContext::get_or_init(&Config::default())
        .await
        .expect("model artifacts must be present under model/");
    AppState::new(context)
}

//
// Model-free tests
//

/// Health reports unavailable when no model is loaded
#[tokio::test]
async fn test_health_without_model() {
    let app = create_app(AppState::new_for_test());

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
    let body: serde_json::Value = response_json(response).await;
    assert_eq!(body["status"], "unavailable");
}

/// Malformed JSON is a 400 with an invalid_request reason
#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(embed_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response_json(response).await;
    assert_eq!(body.error_type, "invalid_request");
}

/// Missing text field never deserializes, so it is invalid_request
#[tokio::test]
async fn test_missing_text_rejected() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(embed_request(r#"{"size": 256}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response_json(response).await;
    assert_eq!(body.error_type, "invalid_request");
}

/// Empty text is a 400 regardless of the requested size
#[tokio::test]
async fn test_empty_text_rejected() {
    for size in VALID_DIMENSIONS {
        let app = create_app(AppState::new_for_test());
        let body = format!(r#"{{"text": "", "size": {size}}}"#);

        let response = app.oneshot(embed_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response_json(response).await;
        assert_eq!(body.error_type, "empty_input");
    }
}

/// Unsupported size is a 400 with invalid_dimension
#[tokio::test]
async fn test_unsupported_size_rejected() {
    let app = create_app(AppState::new_for_test());

    let response = app
        .oneshot(embed_request(r#"{"text": "hello", "size": 999}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response_json(response).await;
    assert_eq!(body.error_type, "invalid_dimension");
    assert!(body.message.contains("999"));
}

/// A valid request against a model-less state is 503, not a panic or a 500
#[tokio::test]
async fn test_valid_request_without_model_is_503() {
    let app = create_app(AppState::new_for_test());

    let response = app
        .oneshot(embed_request(r#"{"text": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorResponse = response_json(response).await;
    assert_eq!(body.error_type, "model_not_ready");
}

//
// End-to-end tests against real model artifacts
//

/// The documented example: {"text": "Rust is amazing", "size": 256} returns
/// 256 floats with unit norm
#[tokio::test]
#[ignore] // Requires model artifacts under model/
async fn test_embed_end_to_end() {
    let app = create_app(ready_state().await);

    let response = app
        .oneshot(embed_request(r#"{"text": "Rust is amazing", "size": 256}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: EmbedResponse = response_json(response).await;
    assert_eq!(body.dimensions, 256);
    assert_eq!(body.embedding.len(), 256);

    let norm: f32 = body.embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
}

/// Every supported size produces exactly that many entries
#[tokio::test]
#[ignore] // Requires model artifacts under model/
async fn test_embed_every_size() {
    let state = ready_state().await;

    for size in VALID_DIMENSIONS {
        let app = create_app(state.clone());
        let body = format!(r#"{{"text": "dimension check", "size": {size}}}"#);

        let response = app.oneshot(embed_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: EmbedResponse = response_json(response).await;
        assert_eq!(body.dimensions, size);
        assert_eq!(body.embedding.len(), size);
    }
}

/// Omitting size yields the full 768-dimensional embedding
#[tokio::test]
#[ignore] // Requires model artifacts under model/
async fn test_embed_default_size() {
    let app = create_app(ready_state().await);

    let response = app
        .oneshot(embed_request(r#"{"text": "default size"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: EmbedResponse = response_json(response).await;
    assert_eq!(body.dimensions, 768);
}
