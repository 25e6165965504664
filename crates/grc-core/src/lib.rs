//! # grc-core
//!
//! Core types and error types for the GRC schema engine.
//!
//! This crate provides the foundational types shared across all engine crates:
//! - Field descriptors and application schemas
//! - Semantic and observed type enums, schema provenance
//! - Discovery phases with their transition table
//! - The connection descriptor handed in by the session collaborator
//! - Validation report types
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod report;

/// Prefix marking reserved metadata keys in record payloads (`@odata.context`, ...).
pub const RESERVED_KEY_PREFIX: char = '@';

/// Whether a record key is a reserved metadata key rather than a field.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(RESERVED_KEY_PREFIX)
}

/// Whether a record key names a schema field: not blank and not reserved.
///
/// Inference, validation and metadata parsing all filter keys through this,
/// so a key dropped by one is never reported as drift by another.
#[must_use]
pub fn is_field_key(key: &str) -> bool {
    !key.trim().is_empty() && !is_reserved_key(key)
}
