//! Validation report types.
//!
//! A report is produced fresh for each validation pass and never cached.
//! Type mismatches are data, not errors: a report is always returned even
//! when every field disagrees with the schema.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ObservedType, SemanticType};

/// Result of comparing a schema against a fresh batch of records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub application_id: i64,
    pub application_name: String,
    pub records_examined: usize,
    /// Per-field statistics for schema fields present in the fresh data.
    pub field_coverage: Vec<FieldCoverage>,
    /// Fields seen in fresh data but absent from the schema.
    pub missing_schema_fields: Vec<String>,
    /// Fields declared in the schema but absent from the fresh data.
    pub extra_schema_fields: Vec<String>,
    pub data_type_mismatches: Vec<TypeMismatch>,
}

impl ValidationReport {
    /// Whether the schema diverges from the live data in any way.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        !self.missing_schema_fields.is_empty()
            || !self.extra_schema_fields.is_empty()
            || !self.data_type_mismatches.is_empty()
    }

    /// Coverage entry for a field, if it was validated.
    #[must_use]
    pub fn coverage(&self, field: &str) -> Option<&FieldCoverage> {
        self.field_coverage.iter().find(|c| c.field == field)
    }

    /// Mismatch entry for a field, if any value disagreed with its type.
    #[must_use]
    pub fn mismatch(&self, field: &str) -> Option<&TypeMismatch> {
        self.data_type_mismatches.iter().find(|m| m.field == field)
    }
}

/// Statistics for one schema field across the fresh batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldCoverage {
    pub field: String,
    pub expected_type: SemanticType,
    /// Histogram of observed value classes (nulls and empty strings excluded).
    pub observed_types: BTreeMap<ObservedType, usize>,
    pub null_count: usize,
    pub empty_count: usize,
    /// Records that did not carry the key at all.
    pub absent_count: usize,
    pub unique_value_count: usize,
    /// First distinct values seen, truncated for display.
    pub value_samples: Vec<String>,
    pub mismatch_count: usize,
    pub mismatch_examples: Vec<MismatchExample>,
}

/// One concrete value that disagreed with the declared type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MismatchExample {
    pub record_index: usize,
    pub expected_type: SemanticType,
    pub observed_type: ObservedType,
    pub value: String,
}

/// A field whose observed types disagree with its declared type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeMismatch {
    pub field: String,
    pub expected_type: SemanticType,
    pub observed_types: BTreeMap<ObservedType, usize>,
    pub mismatch_count: usize,
    pub examples: Vec<MismatchExample>,
}

impl From<&FieldCoverage> for TypeMismatch {
    fn from(coverage: &FieldCoverage) -> Self {
        Self {
            field: coverage.field.clone(),
            expected_type: coverage.expected_type,
            observed_types: coverage.observed_types.clone(),
            mismatch_count: coverage.mismatch_count,
            examples: coverage.mismatch_examples.clone(),
        }
    }
}
