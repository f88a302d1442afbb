// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Engram memory store.

use thiserror::Error;

/// The primary error type used across all Engram crates.
#[derive(Debug, Error)]
pub enum EngramError {
    /// A required field is missing or malformed. Surfaced as HTTP 400.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend errors (database open, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, bad values at startup).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP gateway errors (bind failure, serve failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Client-side transport errors (server unreachable, bad response).
    ///
    /// Callers are expected to degrade gracefully on this variant: log a
    /// warning and disable the memory feature rather than crash.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngramError {
    /// True when the error should map to a 400 response at the HTTP layer.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngramError::Validation(_))
    }
}
