//! Type enums, schema provenance, and discovery phases.
//!
//! All enums serialize to lowercase / `snake_case` strings so schemas and
//! reports read the same way on the wire as they do in logs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SemanticType
// ---------------------------------------------------------------------------

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    String,
    Number,
    Date,
    Boolean,
    Reference,
    #[serde(rename = "valuelist")]
    ValueList,
}

impl SemanticType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Reference => "reference",
            Self::ValueList => "valuelist",
        }
    }

    /// Observed value classes a field of this type accepts without drift.
    ///
    /// `None` means the type places no constraint on observed values.
    #[must_use]
    pub const fn accepted_observations(self) -> Option<&'static [ObservedType]> {
        match self {
            Self::String => Some(&[
                ObservedType::String,
                ObservedType::NumericString,
                ObservedType::BooleanString,
            ]),
            Self::Number => Some(&[ObservedType::Number, ObservedType::NumericString]),
            Self::Boolean => Some(&[ObservedType::Boolean, ObservedType::BooleanString]),
            Self::Date => Some(&[ObservedType::Date]),
            Self::Reference => Some(&[ObservedType::ReferenceObject]),
            Self::ValueList => None,
        }
    }

    /// Whether an observed value class is compatible with this declared type.
    #[must_use]
    pub fn accepts(self, observed: ObservedType) -> bool {
        self.accepted_observations()
            .is_none_or(|accepted| accepted.contains(&observed))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(Self::String),
            "number" | "numeric" => Ok(Self::Number),
            "date" | "datetime" => Ok(Self::Date),
            "boolean" | "bool" => Ok(Self::Boolean),
            "reference" => Ok(Self::Reference),
            "valuelist" | "values_list" => Ok(Self::ValueList),
            other => Err(CoreError::Validation(format!(
                "unknown semantic type: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ObservedType
// ---------------------------------------------------------------------------

/// Class of a live value as seen by the validator.
///
/// Finer than [`SemanticType`]: stringly-typed numbers and booleans are kept
/// apart from parsed ones so they can be accepted by `string` fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ObservedType {
    String,
    NumericString,
    BooleanString,
    Number,
    Boolean,
    Date,
    ReferenceObject,
    Object,
    Array,
}

impl ObservedType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::NumericString => "numeric_string",
            Self::BooleanString => "boolean_string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::ReferenceObject => "reference_object",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ObservedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SchemaSource
// ---------------------------------------------------------------------------

/// Provenance of an application schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSource {
    /// Parsed from the target system's metadata endpoint (authoritative).
    Metadata,
    /// Inferred from live sample records (heuristic).
    Sample,
    /// Loaded from a previously persisted copy.
    Cache,
}

impl SchemaSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Sample => "sample",
            Self::Cache => "cache",
        }
    }

    /// Whether the schema came from an authoritative source.
    #[must_use]
    pub const fn is_authoritative(self) -> bool {
        matches!(self, Self::Metadata)
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DiscoveryPhase
// ---------------------------------------------------------------------------

/// Phase of a single schema discovery run.
///
/// ```text
/// not_started → metadata_attempted → resolved
///                                  → sample_attempted → resolved
///                                                     → failed
/// ```
///
/// A failed metadata attempt is never terminal; only the sample attempt can
/// move a run to `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryPhase {
    NotStarted,
    MetadataAttempted,
    SampleAttempted,
    Resolved,
    Failed,
}

impl DiscoveryPhase {
    /// Valid next phases from the current phase.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::NotStarted => &[Self::MetadataAttempted],
            Self::MetadataAttempted => &[Self::Resolved, Self::SampleAttempted],
            Self::SampleAttempted => &[Self::Resolved, Self::Failed],
            Self::Resolved | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::MetadataAttempted => "metadata_attempted",
            Self::SampleAttempted => "sample_attempted",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DiscoveryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_type_serializes_lowercase() {
        let json = serde_json::to_string(&SemanticType::ValueList).unwrap();
        assert_eq!(json, "\"valuelist\"");
        let back: SemanticType = serde_json::from_str("\"reference\"").unwrap();
        assert_eq!(back, SemanticType::Reference);
    }

    #[test]
    fn semantic_type_parses_aliases() {
        assert_eq!("Text".parse::<SemanticType>().unwrap(), SemanticType::String);
        assert_eq!(" numeric ".parse::<SemanticType>().unwrap(), SemanticType::Number);
        assert_eq!("DateTime".parse::<SemanticType>().unwrap(), SemanticType::Date);
        assert!("attachment".parse::<SemanticType>().is_err());
    }

    #[test]
    fn string_accepts_stringly_values() {
        assert!(SemanticType::String.accepts(ObservedType::String));
        assert!(SemanticType::String.accepts(ObservedType::NumericString));
        assert!(SemanticType::String.accepts(ObservedType::BooleanString));
        assert!(!SemanticType::String.accepts(ObservedType::Number));
        assert!(!SemanticType::String.accepts(ObservedType::ReferenceObject));
    }

    #[test]
    fn number_and_boolean_accept_their_string_forms() {
        assert!(SemanticType::Number.accepts(ObservedType::Number));
        assert!(SemanticType::Number.accepts(ObservedType::NumericString));
        assert!(!SemanticType::Number.accepts(ObservedType::String));
        assert!(SemanticType::Boolean.accepts(ObservedType::BooleanString));
        assert!(!SemanticType::Boolean.accepts(ObservedType::NumericString));
    }

    #[test]
    fn date_and_reference_are_strict() {
        assert!(SemanticType::Date.accepts(ObservedType::Date));
        assert!(!SemanticType::Date.accepts(ObservedType::NumericString));
        assert!(!SemanticType::Date.accepts(ObservedType::String));
        assert!(SemanticType::Reference.accepts(ObservedType::ReferenceObject));
        assert!(!SemanticType::Reference.accepts(ObservedType::Object));
    }

    #[test]
    fn valuelist_accepts_anything() {
        for observed in [
            ObservedType::String,
            ObservedType::Number,
            ObservedType::Array,
            ObservedType::Object,
        ] {
            assert!(SemanticType::ValueList.accepts(observed));
        }
    }

    #[test]
    fn discovery_phase_transitions() {
        use DiscoveryPhase::*;
        assert!(NotStarted.can_transition_to(MetadataAttempted));
        assert!(!NotStarted.can_transition_to(SampleAttempted));
        assert!(MetadataAttempted.can_transition_to(Resolved));
        assert!(MetadataAttempted.can_transition_to(SampleAttempted));
        assert!(!MetadataAttempted.can_transition_to(Failed));
        assert!(SampleAttempted.can_transition_to(Failed));
        assert!(Resolved.allowed_next_states().is_empty());
        assert!(Failed.is_terminal());
        assert!(!SampleAttempted.is_terminal());
    }

    #[test]
    fn observed_type_display_matches_serde() {
        for observed in [
            ObservedType::NumericString,
            ObservedType::BooleanString,
            ObservedType::ReferenceObject,
        ] {
            let json = serde_json::to_string(&observed).unwrap();
            assert_eq!(json, format!("\"{observed}\""));
        }
    }
}
