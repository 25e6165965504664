//! Schema validation against fresh records.
//!
//! Reconciles a discovered schema with a live batch: which fields appeared
//! or disappeared, and for every field present on both sides, how its values
//! are distributed across observed types and whether they agree with the
//! declared type.

use std::collections::{BTreeMap, HashSet};

use grc_core::entities::{ApplicationSchema, FieldDescriptor};
use grc_core::is_field_key;
use grc_core::report::{FieldCoverage, MismatchExample, TypeMismatch, ValidationReport};
use serde_json::Value;
use tracing::{debug, warn};

use crate::type_inference::observe_type;

/// Distinct values kept per field.
pub const MAX_VALUE_SAMPLES: usize = 10;
/// Mismatch examples kept per field.
pub const MAX_MISMATCH_EXAMPLES: usize = 3;
/// Longest sample value, in characters, before truncation.
pub const MAX_SAMPLE_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Compare `schema` against `records`.
///
/// Never fails: disagreement between schema and data is the report's
/// content, not an error.
#[must_use]
pub fn validate(schema: &ApplicationSchema, records: &[Value]) -> ValidationReport {
    let fresh_fields = collect_field_names(records);
    let fresh_set: HashSet<&str> = fresh_fields.iter().map(String::as_str).collect();
    let schema_set: HashSet<&str> = schema.field_names().collect();

    let missing_schema_fields: Vec<String> = fresh_fields
        .iter()
        .filter(|name| !schema_set.contains(name.as_str()))
        .cloned()
        .collect();
    let extra_schema_fields: Vec<String> = schema
        .field_names()
        .filter(|name| !fresh_set.contains(name))
        .map(str::to_string)
        .collect();

    let field_coverage: Vec<FieldCoverage> = schema
        .fields
        .iter()
        .filter(|field| fresh_set.contains(field.name.as_str()))
        .map(|field| cover_field(field, records))
        .collect();

    let data_type_mismatches: Vec<TypeMismatch> = field_coverage
        .iter()
        .filter(|coverage| coverage.mismatch_count > 0)
        .map(TypeMismatch::from)
        .collect();

    let report = ValidationReport {
        application_id: schema.application_id,
        application_name: schema.application_name.clone(),
        records_examined: records.len(),
        field_coverage,
        missing_schema_fields,
        extra_schema_fields,
        data_type_mismatches,
    };

    if report.has_drift() {
        warn!(
            application = %report.application_name,
            missing = report.missing_schema_fields.len(),
            extra = report.extra_schema_fields.len(),
            mismatched = report.data_type_mismatches.len(),
            "schema drift detected"
        );
    } else {
        debug!(
            application = %report.application_name,
            records = report.records_examined,
            "schema matches live data"
        );
    }

    report
}

/// Union of field keys across all object records, first-seen order.
fn collect_field_names(records: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for map in records.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if is_field_key(key) && seen.insert(key.as_str()) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn cover_field(field: &FieldDescriptor, records: &[Value]) -> FieldCoverage {
    let expected = field.field_type;
    let mut coverage = FieldCoverage {
        field: field.name.clone(),
        expected_type: expected,
        observed_types: BTreeMap::new(),
        null_count: 0,
        empty_count: 0,
        absent_count: 0,
        unique_value_count: 0,
        value_samples: Vec::new(),
        mismatch_count: 0,
        mismatch_examples: Vec::new(),
    };
    let mut distinct: HashSet<String> = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let Some(map) = record.as_object() else {
            continue;
        };
        let Some(value) = map.get(&field.name) else {
            coverage.absent_count += 1;
            continue;
        };
        if value.as_str().is_some_and(str::is_empty) {
            coverage.empty_count += 1;
            continue;
        }
        let Some(observed) = observe_type(value) else {
            coverage.null_count += 1;
            continue;
        };

        *coverage.observed_types.entry(observed).or_default() += 1;

        let display = display_value(value);
        if distinct.insert(display.clone()) && coverage.value_samples.len() < MAX_VALUE_SAMPLES {
            coverage.value_samples.push(truncate(&display));
        }

        if !expected.accepts(observed) {
            coverage.mismatch_count += 1;
            if coverage.mismatch_examples.len() < MAX_MISMATCH_EXAMPLES {
                coverage.mismatch_examples.push(MismatchExample {
                    record_index: index,
                    expected_type: expected,
                    observed_type: observed,
                    value: truncate(&display),
                });
            }
        }
    }

    coverage.unique_value_count = distinct.len();
    coverage
}

/// Strings as their content, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_SAMPLE_CHARS {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(MAX_SAMPLE_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
