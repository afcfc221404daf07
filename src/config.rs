// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration from environment variables.
//!
//! The serverless deployment carries no CLI surface: everything is read from
//! the environment with sensible defaults, so the same binary runs under the
//! Lambda runtime and as a local development server.

use std::env;

/// Default location of the ONNX model graph. The quantized model stores its
/// weights in an external `model_quantized.onnx_data` file next to the graph,
/// which ONNX Runtime loads automatically.
const DEFAULT_MODEL_PATH: &str = "model/model_quantized.onnx";

/// Default location of the HuggingFace tokenizer configuration
const DEFAULT_TOKENIZER_PATH: &str = "model/tokenizer.json";

/// Runtime configuration resolved once at process start
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the ONNX model file
    pub model_path: String,

    /// Path to the tokenizer JSON file
    pub tokenizer_path: String,

    /// Port for the local development server (ignored under Lambda)
    pub api_port: u16,

    /// ONNX Runtime intra-op thread count. Defaults to 1: the quantized
    /// model runs fastest single-threaded on serverless CPUs.
    pub intra_threads: usize,
}

impl Config {
    /// Reads configuration from `MODEL_PATH`, `TOKENIZER_PATH`, `API_PORT`
    /// and `ORT_INTRA_THREADS`, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
        let tokenizer_path =
            env::var("TOKENIZER_PATH").unwrap_or_else(|_| DEFAULT_TOKENIZER_PATH.to_string());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let intra_threads = env::var("ORT_INTRA_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1);

        Self {
            model_path,
            tokenizer_path,
            api_port,
            intra_threads,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            tokenizer_path: DEFAULT_TOKENIZER_PATH.to_string(),
            api_port: 8080,
            intra_threads: 1,
        }
    }
}
