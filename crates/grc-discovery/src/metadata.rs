//! Wire formats for the metadata document and the endpoint listing.
//!
//! Only JSON bodies are read. Markup bodies and unrecognized shapes are
//! reported as [`DiscoveryError::UnsupportedFormat`]; whether that is fatal
//! is the caller's decision.

use std::collections::HashSet;

use grc_core::entities::{ApplicationSchema, FieldDescriptor};
use grc_core::enums::{SchemaSource, SemanticType};
use grc_core::is_field_key;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DiscoveryError;

// ── Metadata document ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MetadataDocument {
    Wrapped {
        #[serde(alias = "applications")]
        value: Vec<MetadataApplication>,
    },
    Bare(Vec<MetadataApplication>),
}

/// One application as described by the metadata endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataApplication {
    #[serde(alias = "id")]
    pub application_id: i64,
    #[serde(alias = "name")]
    pub application_name: String,
    #[serde(default)]
    pub retrieval_path: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetadataField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataField {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub field_id: Option<i64>,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl MetadataField {
    fn into_descriptor(self) -> FieldDescriptor {
        // Names the engine does not know are treated as free text.
        let field_type = self
            .field_type
            .as_deref()
            .and_then(|name| name.parse::<SemanticType>().ok())
            .unwrap_or(SemanticType::String);
        FieldDescriptor {
            name: self.name,
            field_type,
            nullable: self.nullable.unwrap_or(true),
            max_length: self.max_length.filter(|_| field_type == SemanticType::String),
            is_active: true,
            field_id: self.field_id,
        }
    }
}

impl MetadataApplication {
    /// Build a metadata-sourced schema.
    ///
    /// Unnamed and reserved (`@...`) fields are dropped and repeated names keep their first
    /// occurrence. `fallback_path` is used when the document carries no
    /// retrieval path of its own.
    pub fn into_schema(self, fallback_path: &str) -> Result<ApplicationSchema, DiscoveryError> {
        let mut seen = HashSet::new();
        let fields: Vec<FieldDescriptor> = self
            .fields
            .into_iter()
            .filter(|field| is_field_key(&field.name))
            .filter(|field| seen.insert(field.name.clone()))
            .map(MetadataField::into_descriptor)
            .collect();

        let retrieval_path = self
            .retrieval_path
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| fallback_path.to_string());

        Ok(ApplicationSchema::new(
            self.application_id,
            self.application_name,
            retrieval_path,
            fields,
            SchemaSource::Metadata,
        )?)
    }
}

/// Parse a metadata body into its application descriptions.
///
/// # Errors
///
/// [`DiscoveryError::UnsupportedFormat`] for empty, markup, or unrecognized
/// bodies.
pub fn parse_metadata(body: &str) -> Result<Vec<MetadataApplication>, DiscoveryError> {
    let body = reject_non_json(body, "metadata")?;
    let document: MetadataDocument = serde_json::from_str(body).map_err(|e| {
        DiscoveryError::UnsupportedFormat(format!("unrecognized metadata document: {e}"))
    })?;
    Ok(match document {
        MetadataDocument::Wrapped { value } | MetadataDocument::Bare(value) => value,
    })
}

// ── Endpoint listing ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ServiceDocument {
    value: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

const ENTITY_SET_KIND: &str = "EntitySet";

/// Parse a service document into retrieval paths, in listing order.
///
/// Entries of a kind other than `EntitySet` (functions, singletons) are
/// skipped; duplicates keep their first occurrence.
///
/// # Errors
///
/// [`DiscoveryError::UnsupportedFormat`] for empty, markup, or unrecognized
/// bodies.
pub fn parse_endpoints(body: &str) -> Result<Vec<String>, DiscoveryError> {
    let body = reject_non_json(body, "endpoint listing")?;
    let document: ServiceDocument = serde_json::from_str(body).map_err(|e| {
        DiscoveryError::UnsupportedFormat(format!("unrecognized service document: {e}"))
    })?;

    let mut seen = HashSet::new();
    Ok(document
        .value
        .into_iter()
        .filter(|entry| entry.kind.as_deref().is_none_or(|kind| kind == ENTITY_SET_KIND))
        .map(|entry| entry.url.filter(|url| !url.is_empty()).unwrap_or(entry.name))
        .filter(|path| !path.is_empty() && seen.insert(path.clone()))
        .collect())
}

// ── Record envelope ────────────────────────────────────────────────

/// Extract the `value` array of a record response.
///
/// A missing key, a non-array `value`, or an empty array all mean no records.
///
/// # Errors
///
/// [`DiscoveryError::Parse`] if the body is not JSON,
/// [`DiscoveryError::NoRecords`] if it carries no records.
pub fn parse_records(body: &str, path: &str) -> Result<Vec<Value>, DiscoveryError> {
    let mut envelope: Value = serde_json::from_str(body)
        .map_err(|e| DiscoveryError::Parse(format!("record response from '{path}': {e}")))?;

    match envelope.get_mut("value").map(Value::take) {
        Some(Value::Array(records)) if !records.is_empty() => Ok(records),
        _ => Err(DiscoveryError::NoRecords {
            path: path.to_string(),
        }),
    }
}

fn reject_non_json<'a>(body: &'a str, what: &str) -> Result<&'a str, DiscoveryError> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(DiscoveryError::UnsupportedFormat(format!("empty {what} body")));
    }
    if trimmed.starts_with('<') {
        return Err(DiscoveryError::UnsupportedFormat(format!(
            "{what} body is markup, not JSON"
        )));
    }
    Ok(trimmed)
}
