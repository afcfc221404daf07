// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! AWS Lambda event loop.
//!
//! Each warm execution environment processes one event at a time; the
//! `ModelContext` loaded at cold start is cloned (by `Arc`) into every
//! invocation, so warm requests pay no model I/O.

use crate::api::embed::{run_embed, EmbedRequest};
use crate::api::errors::ErrorResponse;
use crate::embeddings::ModelContext;
use lambda_http::{service_fn, Body, Error, Request, Response};
use std::sync::Arc;
use tracing::{error, warn};

/// Runs the Lambda runtime loop until the environment is torn down
pub async fn run(context: Arc<ModelContext>) -> Result<(), Error> {
    lambda_http::run(service_fn(move |event| {
        let context = context.clone();
        async move { handle_event(context, event).await }
    }))
    .await
}

/// Handles one Lambda invocation: parse the JSON body, drive the pipeline,
/// serialize the result or a structured error
pub async fn handle_event(
    context: Arc<ModelContext>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let request: EmbedRequest = match serde_json::from_slice(event.body()) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "malformed embed request body");
            return Ok(error_response(
                400,
                "invalid_request",
                &format!("invalid JSON body: {}", e),
            ));
        }
    };

    match run_embed(&context, &request) {
        Ok(response) => {
            let body = serde_json::to_string(&response)?;
            let response = Response::builder()
                .status(200)
                .header("content-type", "application/json")
                .body(Body::from(body))?;
            Ok(response)
        }
        Err(err) => {
            if err.is_client_error() {
                warn!(error = %err, "embed request rejected");
            } else {
                error!(error = %err, "embedding generation failed");
            }
            Ok(error_response(
                err.status_code(),
                err.error_type(),
                &err.user_message(),
            ))
        }
    }
}

fn error_response(status: u16, error_type: &str, message: &str) -> Response<Body> {
    let body = serde_json::to_string(&ErrorResponse::new(error_type, message))
        .unwrap_or_else(|_| r#"{"error_type":"internal_error","message":"unknown error"}"#.into());

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|e| {
            error!(error = %e, "failed to build error response");
            // Absolute fallback, must not panic inside the event loop
            let mut fallback = Response::new(Body::from(
                r#"{"error_type":"internal_error","message":"internal server error"}"#,
            ));
            *fallback.status_mut() = lambda_http::http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
