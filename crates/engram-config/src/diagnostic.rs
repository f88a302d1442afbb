// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic rendering for configuration errors.
//!
//! Wraps figment parse failures and semantic validation failures in miette
//! diagnostics so startup errors render with codes and help text instead of
//! a bare Debug dump.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic metadata.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration parsed but a value is semantically invalid.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(engram::config::invalid_value))]
    Validation {
        /// Human-readable description of the invalid value.
        message: String,
    },

    /// The configuration sources could not be parsed or merged.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(engram::config::parse),
        help("check engram.toml syntax and ENGRAM_* environment variables")
    )]
    Parse {
        /// The underlying figment error, rendered.
        message: String,
    },
}

/// Render all collected errors to stderr as miette reports.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }
}

/// Convert a figment load/merge error into our diagnostic type.
pub fn figment_to_config_error(err: figment::Error) -> ConfigError {
    ConfigError::Parse {
        message: err.to_string(),
    }
}
