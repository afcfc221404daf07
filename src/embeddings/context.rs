// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Process-wide model context.
//!
//! Owns the tokenizer and the ONNX session, constructed exactly once per
//! process lifetime and shared read-only by every request. The lifecycle is
//! Uninitialized → Loading → Ready: loading happens before the first request
//! is served, a load failure is fatal (the process exits instead of serving
//! degraded responses), and once Ready the context is never reloaded.

use crate::config::Config;
use crate::embeddings::codec::TokenCodec;
use crate::embeddings::engine::InferenceEngine;
use crate::embeddings::pooling::{l2_normalize, mean_pool, select_dimensions};
use crate::embeddings::HIDDEN_DIM;
use crate::error::EmbedError;
use anyhow::{Context as _, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

static CONTEXT: OnceCell<Arc<ModelContext>> = OnceCell::const_new();

/// Immutable bundle of tokenizer and inference session
pub struct ModelContext {
    codec: TokenCodec,
    engine: InferenceEngine,
}

impl ModelContext {
    /// Loads tokenizer and model weights from the configured paths.
    ///
    /// Runs one validation inference after loading so a misconfigured model
    /// (wrong input names, wrong hidden dimension) fails here, at load time,
    /// instead of on the first real request.
    ///
    /// # Errors
    /// Any failure is the fatal `Loading → Fatal` transition; callers must
    /// not serve requests with it.
    pub fn load(config: &Config) -> Result<Self> {
        info!(
            model_path = %config.model_path,
            tokenizer_path = %config.tokenizer_path,
            "loading model context"
        );

        let codec = TokenCodec::from_file(Path::new(&config.tokenizer_path))
            .context("failed to load tokenizer")?;
        let engine = InferenceEngine::from_file(Path::new(&config.model_path), config.intra_threads)
            .context("failed to load ONNX model")?;

        let context = Self { codec, engine };

        // Validation inference: tokenize a fixed probe and check the model
        // answers with [1, seq_len, HIDDEN_DIM]
        let probe = context
            .codec
            .encode("validation probe")
            .map_err(|e| anyhow::anyhow!("tokenizer validation failed: {e}"))?;
        let hidden = context
            .engine
            .run(&probe)
            .map_err(|e| anyhow::anyhow!("model validation inference failed: {e}"))?;
        if hidden.ncols() != HIDDEN_DIM {
            anyhow::bail!(
                "model outputs {} hidden dimensions (expected {})",
                hidden.ncols(),
                HIDDEN_DIM
            );
        }

        info!(hidden_dim = HIDDEN_DIM, "model context ready");

        Ok(context)
    }

    /// Returns the process-wide context, loading it on first call.
    ///
    /// Exactly-once semantics: concurrent first callers wait on the same
    /// initialization instead of double-loading the model. Warm invocations
    /// get the already-loaded context with no I/O.
    pub async fn get_or_init(config: &Config) -> Result<Arc<ModelContext>> {
        CONTEXT
            .get_or_try_init(|| async { ModelContext::load(config).map(Arc::new) })
            .await
            .cloned()
    }

    /// Generates a unit-normalized embedding of the requested dimension.
    ///
    /// Drives the full pipeline: tokenize → infer → pool → normalize →
    /// select. `size` must already be validated against
    /// [`crate::embeddings::VALID_DIMENSIONS`] by the request layer.
    pub fn embed(&self, text: &str, size: usize) -> Result<Vec<f32>, EmbedError> {
        let encoded = self.codec.encode(text)?;
        let hidden = self.engine.run(&encoded)?;
        let pooled = mean_pool(hidden.view(), &encoded.attention_mask)?;
        let normalized = l2_normalize(&pooled)?;
        select_dimensions(&normalized, size)
    }

    /// Full embedding dimension before Matryoshka truncation
    pub fn hidden_dim(&self) -> usize {
        HIDDEN_DIM
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("hidden_dim", &HIDDEN_DIM)
            .finish_non_exhaustive()
    }
}
