//! Semantic type inference for single record values.
//!
//! Classification is an ordered list of [`InferenceRule`]s; the first rule
//! whose predicate matches decides the type, and values no rule claims are
//! `string`. The order is part of the contract: date strings are checked
//! before numeric strings so `"2024-01-15"` never reads as a number, and
//! reference objects are claimed before the string fallback.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use grc_core::enums::{ObservedType, SemanticType};
use serde_json::Value;

/// One predicate → type rule of the inference chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferenceRule {
    /// Null values; nullability is tracked separately by the caller.
    Null,
    /// Strings in a recognized date shape that are also real calendar dates.
    DateString,
    /// Numeric literals and strings that parse fully as a finite number.
    Numeric,
    /// Boolean literals and `"true"` / `"false"` in any case.
    Boolean,
    /// Objects carrying an `Id` or `Name` key.
    Reference,
}

impl InferenceRule {
    /// Rules in precedence order.
    pub const ORDERED: [Self; 5] = [
        Self::Null,
        Self::DateString,
        Self::Numeric,
        Self::Boolean,
        Self::Reference,
    ];

    /// Whether this rule claims `value`.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Null => value.is_null(),
            Self::DateString => value.as_str().is_some_and(is_date_string),
            Self::Numeric => match value {
                Value::Number(_) => true,
                Value::String(s) => is_numeric_string(s),
                _ => false,
            },
            Self::Boolean => match value {
                Value::Bool(_) => true,
                Value::String(s) => is_boolean_string(s),
                _ => false,
            },
            Self::Reference => is_reference_object(value),
        }
    }

    /// Type assigned to values this rule claims.
    #[must_use]
    pub const fn semantic_type(self) -> SemanticType {
        match self {
            Self::Null => SemanticType::String,
            Self::DateString => SemanticType::Date,
            Self::Numeric => SemanticType::Number,
            Self::Boolean => SemanticType::Boolean,
            Self::Reference => SemanticType::Reference,
        }
    }
}

/// The first rule that claims `value`, if any.
#[must_use]
pub fn matching_rule(value: &Value) -> Option<InferenceRule> {
    InferenceRule::ORDERED
        .into_iter()
        .find(|rule| rule.matches(value))
}

/// Infer the semantic type of one raw value.
///
/// Total and deterministic: every JSON value maps to exactly one type.
#[must_use]
pub fn infer_type(value: &Value) -> SemanticType {
    matching_rule(value).map_or(SemanticType::String, InferenceRule::semantic_type)
}

/// Classify a live value for validation.
///
/// Returns `None` for nulls. Unlike [`infer_type`], strings that look like
/// numbers or booleans keep their own classes so a `string` field holding
/// `"42"` is not reported as drift.
#[must_use]
pub fn observe_type(value: &Value) -> Option<ObservedType> {
    let observed = match value {
        Value::Null => return None,
        Value::String(s) if is_date_string(s) => ObservedType::Date,
        Value::String(s) if is_numeric_string(s) => ObservedType::NumericString,
        Value::String(s) if is_boolean_string(s) => ObservedType::BooleanString,
        Value::String(_) => ObservedType::String,
        Value::Number(_) => ObservedType::Number,
        Value::Bool(_) => ObservedType::Boolean,
        Value::Object(_) if is_reference_object(value) => ObservedType::ReferenceObject,
        Value::Object(_) => ObservedType::Object,
        Value::Array(_) => ObservedType::Array,
    };
    Some(observed)
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Recognized date shapes; `d` stands for one ASCII digit.
const DATE_SHAPES: [(&str, &str); 3] = [
    ("dddd-dd-dd", "%Y-%m-%d"),
    ("dd/dd/dddd", "%m/%d/%Y"),
    ("dd-dd-dddd", "%m-%d-%Y"),
];

/// Leading shape of an ISO-8601 timestamp; seconds are optional.
const TIMESTAMP_PREFIX: &str = "dddd-dd-ddTdd:dd";

/// Timestamp layouts carrying a numeric UTC offset.
const OFFSET_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Timestamp layouts without an offset (a trailing `Z` is stripped first).
const LOCAL_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A string in one of the recognized date shapes that names a real date.
#[must_use]
pub fn is_date_string(s: &str) -> bool {
    if has_shape(s, TIMESTAMP_PREFIX) {
        return is_valid_timestamp(s);
    }
    DATE_SHAPES.iter().any(|(shape, format)| {
        s.len() == shape.len() && has_shape(s, shape) && NaiveDate::parse_from_str(s, format).is_ok()
    })
}

/// A non-empty string that parses fully as a finite number.
#[must_use]
pub fn is_numeric_string(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// `"true"` or `"false"`, ignoring case.
#[must_use]
pub fn is_boolean_string(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

/// An object that points at another record (carries `Id` or `Name`).
#[must_use]
pub fn is_reference_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("Id") || map.contains_key("Name"))
}

/// Whether `s` starts with `shape`, where `d` matches a digit and every other
/// shape byte must match literally.
fn has_shape(s: &str, shape: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= shape.len()
        && shape.bytes().zip(bytes).all(|(expected, actual)| match expected {
            b'd' => actual.is_ascii_digit(),
            literal => literal == *actual,
        })
}

fn is_valid_timestamp(s: &str) -> bool {
    if DateTime::parse_from_rfc3339(s).is_ok()
        || OFFSET_TIMESTAMP_FORMATS
            .iter()
            .any(|format| DateTime::parse_from_str(s, format).is_ok())
    {
        return true;
    }
    let local = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(local, format).is_ok())
}
