// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Stateless text-embedding inference service.
//!
//! Converts raw text into a fixed-size, unit-normalized embedding with
//! caller-selected Matryoshka dimensionality, served from a single binary
//! that runs either as an AWS Lambda function or as a local HTTP server.

pub mod api;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod runtime;

pub use api::{EmbedRequest, EmbedResponse, ErrorResponse};
pub use config::Config;
pub use embeddings::{ModelContext, HIDDEN_DIM, VALID_DIMENSIONS};
pub use error::EmbedError;
