// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use anyhow::{anyhow, Context, Result};
use embedding_service::{runtime, Config, ModelContext};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    // The ONNX Runtime environment must be committed before any session is
    // created; it stays alive for the whole process
    ort::init()
        .with_name("embedding-service")
        .commit()
        .context("failed to initialize ONNX Runtime environment")?;

    let config = Config::from_env();

    // Cold start: load tokenizer and model weights exactly once. A failure
    // here is fatal; the process exits instead of serving degraded responses.
    let context = ModelContext::get_or_init(&config)
        .await
        .context("failed to initialize model context")?;

    if runtime::is_lambda_environment() {
        tracing::info!("starting Lambda runtime");
        runtime::lambda::run(context)
            .await
            .map_err(|e| anyhow!("lambda runtime error: {e}"))?;
    } else {
        tracing::info!(port = config.api_port, "starting local server");
        runtime::local::serve(context, config.api_port).await?;
    }

    Ok(())
}
