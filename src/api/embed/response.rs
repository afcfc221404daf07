// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for the POST /v1/embed endpoint.

use serde::{Deserialize, Serialize};

/// Success body: the unit-normalized embedding plus its dimension count.
/// `dimensions` always equals `embedding.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// The embedding vector, exactly `dimensions` entries
    pub embedding: Vec<f32>,

    /// Dimension of the embedding
    pub dimensions: usize,
}

impl From<Vec<f32>> for EmbedResponse {
    fn from(embedding: Vec<f32>) -> Self {
        Self {
            dimensions: embedding.len(),
            embedding,
        }
    }
}
