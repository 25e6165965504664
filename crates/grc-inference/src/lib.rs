//! # grc-inference
//!
//! Pure schema inference and validation over sampled GRC records.
//!
//! - [`type_inference`]: ordered rule chain mapping one value to a
//!   [`SemanticType`](grc_core::enums::SemanticType), plus the finer
//!   observed-type classifier used during validation
//! - [`fields`]: merges per-record inferences into field descriptors
//! - [`validator`]: diffs a schema against a fresh batch of records
//!
//! Nothing here performs I/O or holds shared state; callers own the records.

pub mod fields;
pub mod type_inference;
pub mod validator;

pub use fields::{InferenceOptions, infer_fields, infer_fields_with};
pub use type_inference::{InferenceRule, infer_type, observe_type};
pub use validator::validate;
