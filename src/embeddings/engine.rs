// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Runtime binding for the embedding model.
//!
//! A narrow capability interface over the tensor-execution backend: given
//! token ids and an attention mask, produce the per-token hidden states.
//! Pooling, normalization and dimension selection live in [`super::pooling`]
//! and stay independent of the backend.

use crate::embeddings::codec::TokenizedInput;
use crate::embeddings::HIDDEN_DIM;
use crate::error::EmbedError;
use anyhow::{Context, Result};
use ndarray::{Array2, Axis, Ix2};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// Per-token hidden states for one request, shape `[num_tokens, HIDDEN_DIM]`
pub type HiddenStates = Array2<f32>;

/// ONNX Runtime session wrapper.
///
/// The session holds the loaded model graph and weights, read-only and
/// reused across calls. ONNX Runtime needs `&mut` to run a session, so calls
/// are serialized through a mutex; apart from that lock there is no per-call
/// mutation of shared state, which keeps concurrent requests safe against
/// the same loaded model.
pub struct InferenceEngine {
    session: Mutex<Session>,
}

impl InferenceEngine {
    /// Loads the ONNX model from disk.
    ///
    /// Uses `GraphOptimizationLevel::Level1`: standard graph optimizations
    /// without the heavyweight passes, the right trade-off for a quantized
    /// model on serverless CPUs.
    ///
    /// # Errors
    /// Returns an error if the model file is missing or the session cannot
    /// be created. This is a load-time fatal condition.
    pub fn from_file(path: &Path, intra_threads: usize) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("ONNX model file not found: {}", path.display());
        }

        let session = Session::builder()
            .context("failed to create session builder")?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .context("failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("failed to set intra threads")?
            .commit_from_file(path)
            .with_context(|| format!("failed to load ONNX model from {}", path.display()))?;

        info!(path = %path.display(), intra_threads, "ONNX session created");

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Runs the model over one tokenized input.
    ///
    /// Inputs are shaped `[1, seq_len]`; the model outputs
    /// `last_hidden_state` with shape `[1, seq_len, HIDDEN_DIM]`, returned
    /// here with the batch dimension removed.
    ///
    /// # Errors
    /// - `EmbedError::Inference` on any runtime failure
    /// - `EmbedError::UnexpectedOutputShape` if the output tensor is not
    ///   `[1, seq_len, HIDDEN_DIM]`
    pub fn run(&self, input: &TokenizedInput) -> Result<HiddenStates, EmbedError> {
        let seq_len = input.len();

        let input_ids = Array2::from_shape_vec((1, seq_len), input.ids.clone())?;
        let attention_mask = Array2::from_shape_vec((1, seq_len), input.attention_mask.clone())?;

        // Recover from a poisoned lock: the session holds no invariant a
        // panicked caller could have left half-updated.
        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("session mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        };

        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids)?,
            "attention_mask" => Value::from_array(attention_mask)?,
        ])?;

        let hidden = outputs[0].try_extract_array::<f32>()?;

        let shape = hidden.shape().to_vec();
        if shape.len() != 3 || shape[0] != 1 || shape[2] != HIDDEN_DIM {
            return Err(EmbedError::UnexpectedOutputShape { shape });
        }

        let states = hidden
            .index_axis(Axis(0), 0)
            .to_owned()
            .into_dimensionality::<Ix2>()?;

        Ok(states)
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine").finish_non_exhaustive()
    }
}
