// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding inference pipeline.
//!
//! This module turns raw text into a fixed-size, unit-normalized embedding
//! vector using ONNX Runtime and a Matryoshka-trained sentence transformer:
//! - Tokenization via the HuggingFace tokenizer ([`TokenCodec`])
//! - Per-token hidden states from the ONNX session ([`InferenceEngine`])
//! - Masked mean pooling, L2 normalization, and Matryoshka prefix
//!   selection ([`pooling`])
//! - Process-wide model ownership with exactly-once initialization
//!   ([`ModelContext`])

pub mod codec;
pub mod context;
pub mod engine;
pub mod pooling;

pub use codec::{TokenCodec, TokenizedInput};
pub use context::ModelContext;
pub use engine::{HiddenStates, InferenceEngine};
pub use pooling::{l2_normalize, mean_pool, select_dimensions};

/// Valid output dimensions for Matryoshka truncation
pub const VALID_DIMENSIONS: [usize; 4] = [128, 256, 512, 768];

/// Hidden dimension of the model's per-token output, and the full embedding
/// size. Fixed by the model architecture.
pub const HIDDEN_DIM: usize = 768;
