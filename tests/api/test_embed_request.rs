// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request validation tests for EmbedRequest.
//!
//! Validation failures must be reported before the request reaches the
//! model, with the right error class for each rule.

use embedding_service::api::embed::request::MAX_TEXT_LENGTH;
use embedding_service::{EmbedError, EmbedRequest, VALID_DIMENSIONS};

/// A simple, valid request passes validation
#[test]
fn test_valid_request() {
    let request = EmbedRequest {
        text: "Hello world".to_string(),
        size: 768,
    };

    assert!(request.validate().is_ok());
}

/// Every supported Matryoshka size passes validation
#[test]
fn test_all_supported_sizes_valid() {
    for size in VALID_DIMENSIONS {
        let request = EmbedRequest {
            text: "some text".to_string(),
            size,
        };
        assert!(
            request.validate().is_ok(),
            "size {size} should be supported"
        );
    }
}

/// Omitted size deserializes to the 768 default and validates
#[test]
fn test_default_size_applied() {
    let request: EmbedRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();

    assert_eq!(request.size, 768);
    assert!(request.validate().is_ok());
}

/// Unsupported sizes are rejected as invalid_dimension
#[test]
fn test_unsupported_sizes_rejected() {
    for size in [0, 1, 64, 127, 129, 384, 999, 1024] {
        let request = EmbedRequest {
            text: "some text".to_string(),
            size,
        };

        let err = request.validate().unwrap_err();
        assert!(
            matches!(err, EmbedError::InvalidDimension { size: got } if got == size),
            "size {size} should be rejected"
        );
        assert_eq!(err.status_code(), 400);
    }
}

/// Empty text is rejected regardless of size
#[test]
fn test_empty_text_rejected() {
    for size in VALID_DIMENSIONS {
        let request = EmbedRequest {
            text: String::new(),
            size,
        };

        let err = request.validate().unwrap_err();
        assert!(matches!(err, EmbedError::EmptyInput));
        assert_eq!(err.status_code(), 400);
    }
}

/// Whitespace-only text counts as empty
#[test]
fn test_whitespace_only_text_rejected() {
    let request = EmbedRequest {
        text: " \t\n ".to_string(),
        size: 768,
    };

    let err = request.validate().unwrap_err();
    assert!(matches!(err, EmbedError::EmptyInput));
}

/// Text over the character limit is rejected with the observed length
#[test]
fn test_oversized_text_rejected() {
    let request = EmbedRequest {
        text: "x".repeat(MAX_TEXT_LENGTH + 1),
        size: 768,
    };

    let err = request.validate().unwrap_err();
    assert!(
        matches!(err, EmbedError::TextTooLong { got, max }
            if got == MAX_TEXT_LENGTH + 1 && max == MAX_TEXT_LENGTH)
    );
}

/// Text exactly at the limit is accepted
#[test]
fn test_text_at_limit_accepted() {
    let request = EmbedRequest {
        text: "x".repeat(MAX_TEXT_LENGTH),
        size: 128,
    };

    assert!(request.validate().is_ok());
}

/// Size is checked before text, so a request that is wrong on both counts
/// reports the dimension problem
#[test]
fn test_size_checked_before_text() {
    let request = EmbedRequest {
        text: String::new(),
        size: 999,
    };

    let err = request.validate().unwrap_err();
    assert!(matches!(err, EmbedError::InvalidDimension { .. }));
}
