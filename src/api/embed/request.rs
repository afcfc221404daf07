// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for the POST /v1/embed endpoint.

use crate::embeddings::VALID_DIMENSIONS;
use crate::error::EmbedError;
use serde::{Deserialize, Serialize};

/// Maximum input text length in characters.
/// Prevents OOM from extremely long inputs before tokenization even starts.
pub const MAX_TEXT_LENGTH: usize = 100_000;

/// Request body for POST /v1/embed
///
/// # Example
/// ```json
/// {
///   "text": "Rust is amazing",
///   "size": 256
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// The text to embed
    pub text: String,

    /// Output dimension: 128, 256, 512, or 768 (default: 768)
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    768
}

impl EmbedRequest {
    /// Validates the request before it is allowed anywhere near the model.
    ///
    /// # Validation Rules
    /// 1. **size**: must be one of the Matryoshka dimensions (128/256/512/768)
    /// 2. **text**: must not be empty or whitespace-only
    /// 3. **text length**: at most [`MAX_TEXT_LENGTH`] characters
    pub fn validate(&self) -> Result<(), EmbedError> {
        if !VALID_DIMENSIONS.contains(&self.size) {
            return Err(EmbedError::InvalidDimension { size: self.size });
        }

        if self.text.trim().is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        if self.text.len() > MAX_TEXT_LENGTH {
            return Err(EmbedError::TextTooLong {
                got: self.text.len(),
                max: MAX_TEXT_LENGTH,
            });
        }

        Ok(())
    }
}
