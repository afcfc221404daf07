// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Local development server.
//!
//! Serves the same contract as the Lambda deployment over a plain Axum
//! router, and unlike Lambda it accepts concurrent connections, so the
//! pipeline is exercised under real concurrency against one shared
//! `ModelContext`.

use crate::api::embed::embed_handler;
use crate::embeddings::{ModelContext, HIDDEN_DIM, VALID_DIMENSIONS};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
///
/// `context` is `None` only in test harnesses that drive the router without
/// model artifacts; the binary always serves with a Ready context.
#[derive(Clone)]
pub struct AppState {
    pub context: Option<Arc<ModelContext>>,
}

impl AppState {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// State without a model, for router tests covering the 4xx paths
    pub fn new_for_test() -> Self {
        Self { context: None }
    }
}

/// Builds the router. Exposed separately from [`serve`] so tests can drive
/// it with `tower::ServiceExt::oneshot`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/embed", post(embed_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until the process exits
pub async fn serve(context: Arc<ModelContext>, port: u16) -> anyhow::Result<()> {
    let app = create_app(AppState::new(context));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("embedding server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health
///
/// Reports model readiness so infrastructure probes can tell a Ready
/// process from one that failed to load.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.context {
        Some(_) => Json(json!({
            "status": "ok",
            "model": {
                "hidden_dim": HIDDEN_DIM,
                "dimensions": VALID_DIMENSIONS,
            },
        })),
        None => Json(json!({
            "status": "unavailable",
            "model": serde_json::Value::Null,
        })),
    }
}
