// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tokenizer wrapper for the embedding model.
//!
//! Wraps a HuggingFace tokenizer loaded from `tokenizer.json` and produces
//! the integer token ids and attention mask the ONNX model consumes. The
//! codec applies the document prompt template the model was trained with and
//! enforces a deterministic right-cutoff truncation at the token boundary.

use crate::error::EmbedError;
use anyhow::{anyhow, Result};
use std::path::Path;
use tokenizers::utils::truncation::{TruncationDirection, TruncationParams, TruncationStrategy};
use tokenizers::Tokenizer;
use tracing::info;

/// Maximum sequence length in tokens. Longer input is truncated at this
/// boundary by the tokenizer; the post-encode guard rejects anything that
/// still exceeds it (a tokenizer file could disable truncation).
pub const MAX_SEQUENCE_LENGTH: usize = 8192;

/// Token ids plus attention mask for one input text, same length, `i64`
/// because ONNX Runtime consumes 64-bit ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInput {
    pub ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl TokenizedInput {
    /// Number of tokens in the sequence
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Tokenizer adapter turning raw text into model input.
///
/// Deterministic and pure for a fixed tokenizer file: encoding the same text
/// twice yields identical ids and mask.
pub struct TokenCodec {
    tokenizer: Tokenizer,
}

impl TokenCodec {
    /// Loads the tokenizer from a `tokenizer.json` file.
    ///
    /// If the file carries no truncation configuration, a fixed right-cutoff
    /// at [`MAX_SEQUENCE_LENGTH`] tokens is installed so the truncation
    /// policy is explicit rather than inherited from whoever exported the
    /// tokenizer.
    ///
    /// # Errors
    /// Returns an error if the file is missing or not a valid tokenizer
    /// definition. This is a load-time fatal condition.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("tokenizer file not found: {}", path.display());
        }

        let mut tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow!("failed to load tokenizer from {}: {}", path.display(), e))?;

        if tokenizer.get_truncation().is_none() {
            let truncation = TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                strategy: TruncationStrategy::LongestFirst,
                stride: 0,
                direction: TruncationDirection::Right,
            };
            tokenizer
                .with_truncation(Some(truncation))
                .map_err(|e| anyhow!("invalid tokenizer truncation params: {}", e))?;
        }

        info!(path = %path.display(), "tokenizer loaded");

        Ok(Self { tokenizer })
    }

    /// Tokenizes input text with the document prompt format.
    ///
    /// EmbeddingGemma expects documents wrapped in a specific prompt
    /// template: `"title: none | text: {text}"`. Encoding adds the model's
    /// special tokens; no padding is applied for a single-sequence batch.
    pub fn encode(&self, text: &str) -> Result<TokenizedInput, EmbedError> {
        let formatted = format!("title: none | text: {}", text);

        let encoding = self
            .tokenizer
            .encode(formatted, true)
            .map_err(|e| EmbedError::Tokenization(e.to_string()))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        if ids.len() > MAX_SEQUENCE_LENGTH {
            return Err(EmbedError::SequenceTooLong {
                got: ids.len(),
                max: MAX_SEQUENCE_LENGTH,
            });
        }

        Ok(TokenizedInput {
            ids,
            attention_mask,
        })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
