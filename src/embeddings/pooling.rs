// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Pooling, normalization, and Matryoshka dimension selection.
//!
//! Pure functions over the hidden states the model produced: no model
//! dependency, no shared state, freely callable from concurrent requests.

use crate::embeddings::VALID_DIMENSIONS;
use crate::error::EmbedError;
use ndarray::{Array1, ArrayView2, Axis, ErrorKind, ShapeError};

/// Applies masked mean pooling to per-token hidden states.
///
/// For each hidden dimension `d` the output is
/// `sum_t(mask[t] * hidden[t][d]) / sum_t(mask[t])`: the average over
/// unmasked tokens, with masked (padding) tokens excluded from both the sum
/// and the count.
///
/// # Errors
/// - `EmbedError::Shape` if the mask length does not match the token count
/// - `EmbedError::EmptyAttentionMask` if no token is unmasked
pub fn mean_pool(
    hidden_states: ArrayView2<'_, f32>,
    attention_mask: &[i64],
) -> Result<Vec<f32>, EmbedError> {
    if attention_mask.len() != hidden_states.nrows() {
        return Err(EmbedError::Shape(ShapeError::from_kind(
            ErrorKind::IncompatibleShape,
        )));
    }

    let mask_f32: Vec<f32> = attention_mask.iter().map(|&m| m as f32).collect();
    let mask = Array1::from(mask_f32);

    let count = mask.sum();
    if count <= 0.0 {
        return Err(EmbedError::EmptyAttentionMask);
    }

    // Broadcast [seq_len, 1] over [seq_len, hidden_dim] to zero out padding
    let mask_col = mask.insert_axis(Axis(1));
    let masked = &hidden_states * &mask_col;
    let sum = masked.sum_axis(Axis(0));

    Ok((sum / count).to_vec())
}

/// Rescales a vector to unit Euclidean length.
///
/// Normalized embeddings allow similarity via dot product instead of full
/// cosine similarity.
///
/// # Errors
/// `EmbedError::DegenerateVector` if the norm is zero or non-finite.
pub fn l2_normalize(vector: &[f32]) -> Result<Vec<f32>, EmbedError> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

    if !norm.is_finite() || norm <= 0.0 {
        return Err(EmbedError::DegenerateVector(norm));
    }

    Ok(vector.iter().map(|x| x / norm).collect())
}

/// Truncates a normalized embedding to a Matryoshka prefix and re-normalizes.
///
/// The model is trained so that prefixes of the full embedding are
/// themselves meaningful, so selection is nothing more than slicing the
/// first `size` components and rescaling the prefix back to unit length.
///
/// # Errors
/// `EmbedError::UnexpectedOutputShape` if the vector is shorter than the
/// requested prefix; `EmbedError::DegenerateVector` if the prefix has no
/// magnitude.
pub fn select_dimensions(normalized: &[f32], size: usize) -> Result<Vec<f32>, EmbedError> {
    debug_assert!(
        VALID_DIMENSIONS.contains(&size),
        "size must be validated at the request layer"
    );

    if size > normalized.len() {
        return Err(EmbedError::UnexpectedOutputShape {
            shape: vec![normalized.len()],
        });
    }

    l2_normalize(&normalized[..size])
}
