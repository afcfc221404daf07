// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /v1/embed endpoint: request contract, response contract, handler.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_handler, run_embed};
pub use request::EmbedRequest;
pub use response::EmbedResponse;
