// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error response body and HTTP mapping.

use crate::error::EmbedError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

/// Wire shape for every error the service returns: a short machine-readable
/// reason plus a human-readable message. No stack traces, no file paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
        }
    }
}

impl From<&EmbedError> for ErrorResponse {
    fn from(err: &EmbedError) -> Self {
        Self {
            error_type: err.error_type().to_string(),
            message: err.user_message(),
        }
    }
}

/// Axum wrapper mapping `EmbedError` to a status + JSON body
pub struct ApiErrorResponse(pub EmbedError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// 400 response for request bodies that never deserialized into an
/// `EmbedRequest` at all
pub fn invalid_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("invalid_request", message)),
    )
        .into_response()
}

/// 503 response for the window where the model context is not available.
/// The binary never serves before the context is Ready, so this surfaces
/// only from test harnesses driving the router directly.
pub fn model_not_ready() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::new(
            "model_not_ready",
            "embedding model is not loaded",
        )),
    )
        .into_response()
}
