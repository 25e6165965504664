use std::collections::HashSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{SchemaSource, SemanticType};
use crate::errors::CoreError;

/// One field of an application schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: SemanticType,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<i64>,
}

impl FieldDescriptor {
    /// An active, nullable field with no length bound or external id.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
            max_length: None,
            is_active: true,
            field_id: None,
        }
    }
}

/// The schema discovered for one application.
///
/// Immutable once built: a fresh discovery produces a new value rather than
/// editing a cached one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSchema {
    pub application_id: i64,
    pub application_name: String,
    pub retrieval_path: String,
    pub fields: Vec<FieldDescriptor>,
    pub last_updated: DateTime<Utc>,
    pub schema_source: SchemaSource,
}

impl ApplicationSchema {
    /// Assemble a schema stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateField`] if two fields share a name.
    pub fn new(
        application_id: i64,
        application_name: impl Into<String>,
        retrieval_path: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        schema_source: SchemaSource,
    ) -> Result<Self, CoreError> {
        let application_name = application_name.into();
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::DuplicateField {
                    application: application_name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(Self {
            application_id,
            application_name,
            retrieval_path: retrieval_path.into(),
            fields,
            last_updated: Utc::now(),
            schema_source,
        })
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Fields that carried a value in at least one observation.
    pub fn active_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_active)
    }
}

/// Cache key for a schema: one entry per application per tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey {
    pub tenant_id: String,
    pub application_id: i64,
}

impl SchemaKey {
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, application_id: i64) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            application_id,
        }
    }
}

impl std::fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema_{}_{}", self.tenant_id, self.application_id)
    }
}
