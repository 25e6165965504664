//! Cross-cutting error types for the schema engine.
//!
//! Crate-specific failures (`ConfigError`, `DiscoveryError`) live in their
//! own crates. This module holds the errors any crate can raise while
//! building or checking core types.

use thiserror::Error;

/// Errors that can be raised by any engine crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A schema was assembled with two fields of the same name.
    #[error("Duplicate field '{field}' in schema for application {application}")]
    DuplicateField { application: String, field: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
