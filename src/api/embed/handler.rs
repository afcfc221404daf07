// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /v1/embed handler.
//!
//! `run_embed` is the transport-agnostic core shared by the Lambda adapter
//! and the local Axum server; `embed_handler` is the Axum binding.

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::errors::{self, ApiErrorResponse};
use crate::embeddings::ModelContext;
use crate::error::EmbedError;
use crate::runtime::local::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use tracing::{error, info, warn};

/// Validates the request and drives the pipeline.
///
/// Validation failures never reach the model. On success the response
/// carries exactly `request.size` entries.
pub fn run_embed(
    context: &ModelContext,
    request: &EmbedRequest,
) -> Result<EmbedResponse, EmbedError> {
    request.validate()?;

    let embedding = context.embed(&request.text, request.size)?;

    info!(
        text_len = request.text.len(),
        dimensions = embedding.len(),
        "embedding generated"
    );

    Ok(EmbedResponse::from(embedding))
}

/// Logs a pipeline failure at the severity its class deserves and converts
/// it to a response
fn embed_error_response(err: EmbedError) -> Response {
    if err.is_client_error() {
        warn!(error = %err, "embed request rejected");
    } else {
        error!(error = %err, "embedding generation failed");
    }
    ApiErrorResponse(err).into_response()
}

/// POST /v1/embed
///
/// Malformed JSON is rejected as 400 before validation; validation failures
/// are reported as 400 even when the model is unavailable, so bad input is
/// always diagnosed as bad input.
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "malformed embed request body");
            return errors::invalid_request(format!("invalid JSON body: {}", rejection.body_text()));
        }
    };

    let Some(context) = state.context.as_ref() else {
        if let Err(err) = request.validate() {
            return embed_error_response(err);
        }
        return errors::model_not_ready();
    };

    match run_embed(context, &request) {
        Ok(response) => Json(response).into_response(),
        Err(err) => embed_error_response(err),
    }
}
