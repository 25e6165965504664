//! Live validation of a discovered schema.

use grc_core::entities::{ApplicationSchema, ConnectionDescriptor};
use grc_core::report::ValidationReport;

use crate::SchemaDiscovery;
use crate::error::DiscoveryError;

impl SchemaDiscovery {
    /// Compare `schema` against a fresh batch from its retrieval path.
    ///
    /// Always fetches; the schema's age and cache state are irrelevant.
    /// Drift is reported in the returned [`ValidationReport`], never as an
    /// error.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Application`] naming the schema's application when
    /// the batch cannot be fetched or is empty.
    pub async fn validate_application_schema(
        &self,
        schema: &ApplicationSchema,
        connection: &ConnectionDescriptor,
    ) -> Result<ValidationReport, DiscoveryError> {
        let records = self
            .fetch_records(
                connection,
                &schema.retrieval_path,
                self.config.validation_sample_size,
            )
            .await
            .map_err(|e| e.for_application(&schema.application_name))?;

        Ok(grc_inference::validate(schema, &records))
    }
}
