// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error taxonomy for the embedding pipeline.
//!
//! Every pipeline stage returns a typed `EmbedError` rather than aborting
//! the process. Model-load failures are the one exception: they are fatal at
//! startup and propagate as `anyhow` context chains out of
//! `ModelContext::load`, since no request can ever succeed without a model.

use thiserror::Error;

/// Errors that can occur while turning text into an embedding vector
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Empty or whitespace-only text input
    #[error("text input cannot be empty")]
    EmptyInput,

    /// Text input exceeds the maximum character limit
    #[error("text exceeds maximum length of {max} characters (got {got})")]
    TextTooLong { got: usize, max: usize },

    /// Requested output dimension is not one of the Matryoshka sizes
    #[error("unsupported embedding size {size}: must be one of 128, 256, 512, or 768")]
    InvalidDimension { size: usize },

    /// Tokenized sequence exceeds the model's maximum length
    #[error("tokenized sequence exceeds maximum length of {max} tokens (got {got})")]
    SequenceTooLong { got: usize, max: usize },

    /// Tokenizer could not encode the input text
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    /// Attention mask has no unmasked tokens, so there is nothing to pool
    #[error("attention mask contains no unmasked tokens")]
    EmptyAttentionMask,

    /// Pooled vector has a zero or non-finite Euclidean norm
    #[error("embedding vector has degenerate norm {0}")]
    DegenerateVector(f32),

    /// ONNX Runtime failed to produce output
    #[error("inference runtime error: {0}")]
    Inference(#[from] ort::Error),

    /// Tensor construction or conversion failed
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Model produced a tensor with an unexpected shape
    #[error("model produced output with unexpected shape {shape:?}")]
    UnexpectedOutputShape { shape: Vec<usize> },
}

impl EmbedError {
    /// Returns true if this error is the caller's fault (4xx class)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EmbedError::EmptyInput
                | EmbedError::TextTooLong { .. }
                | EmbedError::InvalidDimension { .. }
                | EmbedError::SequenceTooLong { .. }
                | EmbedError::Tokenization(_)
        )
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// Short machine-readable reason string, stable across releases
    pub fn error_type(&self) -> &'static str {
        match self {
            EmbedError::EmptyInput => "empty_input",
            EmbedError::TextTooLong { .. } => "text_too_long",
            EmbedError::InvalidDimension { .. } => "invalid_dimension",
            EmbedError::SequenceTooLong { .. } => "sequence_too_long",
            EmbedError::Tokenization(_) => "tokenization_error",
            EmbedError::EmptyAttentionMask => "empty_attention_mask",
            EmbedError::DegenerateVector(_) => "degenerate_vector",
            EmbedError::Inference(_) => "inference_error",
            EmbedError::Shape(_) | EmbedError::UnexpectedOutputShape { .. } => "internal_error",
        }
    }

    /// User-facing error message.
    ///
    /// Client errors carry their full message so callers can fix their
    /// request. Server errors are logged in full but reported with a generic
    /// message in release builds: runtime error strings can contain file
    /// paths and other internal detail that must not leak to callers.
    pub fn user_message(&self) -> String {
        if self.is_client_error() || cfg!(debug_assertions) {
            self.to_string()
        } else {
            "an internal error occurred while processing the request".to_string()
        }
    }
}
