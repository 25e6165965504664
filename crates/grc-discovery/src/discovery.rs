//! Discovery orchestration: cache, then metadata, then sampling.
//!
//! Each run walks the [`DiscoveryPhase`] table. The metadata attempt can only
//! resolve or hand over to sampling; the sample attempt is the single place
//! a run can fail.

use std::sync::Arc;

use grc_core::entities::{ApplicationSchema, ConnectionDescriptor};
use grc_core::enums::{DiscoveryPhase, SchemaSource};
use grc_inference::{InferenceOptions, infer_fields_with};
use tracing::{debug, info, warn};

use crate::SchemaDiscovery;
use crate::error::DiscoveryError;
use crate::metadata::parse_metadata;

/// Result of [`SchemaDiscovery::discover_with_trace`].
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    pub schema: Arc<ApplicationSchema>,
    /// Phases the run passed through, starting at `not_started`. Empty on a
    /// cache hit.
    pub trace: Vec<DiscoveryPhase>,
    pub cache_hit: bool,
}

/// Phase tracker for one run.
struct DiscoveryRun {
    phase: DiscoveryPhase,
    trace: Vec<DiscoveryPhase>,
}

impl DiscoveryRun {
    fn new() -> Self {
        Self {
            phase: DiscoveryPhase::NotStarted,
            trace: vec![DiscoveryPhase::NotStarted],
        }
    }

    fn advance(&mut self, next: DiscoveryPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid discovery transition {} -> {next}",
            self.phase
        );
        self.phase = next;
        self.trace.push(next);
    }

    fn resolve(mut self, schema: Arc<ApplicationSchema>) -> DiscoveryOutcome {
        self.advance(DiscoveryPhase::Resolved);
        DiscoveryOutcome {
            schema,
            trace: self.trace,
            cache_hit: false,
        }
    }
}

impl SchemaDiscovery {
    /// Resolve the schema of one application for one tenant.
    ///
    /// A cached schema is returned without any network call and keeps its
    /// original `schema_source`. On a miss the metadata endpoint is tried
    /// first; any failure there falls through to sampling. The resolved
    /// schema is cached before it is returned. Nothing is cached on failure.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Application`] naming `application_name` when the
    /// sample fallback fails (transport, status, timeout, or no records).
    pub async fn get_application_schema(
        &self,
        application_id: i64,
        application_name: &str,
        retrieval_path: &str,
        connection: &ConnectionDescriptor,
        tenant_id: &str,
    ) -> Result<Arc<ApplicationSchema>, DiscoveryError> {
        self.discover_with_trace(
            application_id,
            application_name,
            retrieval_path,
            connection,
            tenant_id,
        )
        .await
        .map(|outcome| outcome.schema)
    }

    /// Like [`Self::get_application_schema`], also reporting the phases the
    /// run went through and whether it was served from cache.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_application_schema`].
    pub async fn discover_with_trace(
        &self,
        application_id: i64,
        application_name: &str,
        retrieval_path: &str,
        connection: &ConnectionDescriptor,
        tenant_id: &str,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        if let Some(schema) = self.cache.get_schema(tenant_id, application_id) {
            debug!(tenant = tenant_id, application_id, "schema cache hit");
            return Ok(DiscoveryOutcome {
                schema,
                trace: Vec::new(),
                cache_hit: true,
            });
        }
        debug!(tenant = tenant_id, application_id, "schema cache miss");

        let mut run = DiscoveryRun::new();

        run.advance(DiscoveryPhase::MetadataAttempted);
        match self
            .discover_from_metadata(application_id, retrieval_path, connection, tenant_id)
            .await
        {
            Ok(Some(schema)) => {
                info!(
                    application = application_name,
                    fields = schema.fields.len(),
                    source = %SchemaSource::Metadata,
                    "schema discovered"
                );
                return Ok(run.resolve(schema));
            }
            Ok(None) => debug!(
                application = application_name,
                "metadata does not describe application"
            ),
            Err(e) => warn!(
                application = application_name,
                error = %e,
                "metadata discovery unavailable, falling back to sampling"
            ),
        }

        run.advance(DiscoveryPhase::SampleAttempted);
        match self
            .discover_from_sample(application_id, application_name, retrieval_path, connection, tenant_id)
            .await
        {
            Ok(schema) => {
                info!(
                    application = application_name,
                    fields = schema.fields.len(),
                    source = %SchemaSource::Sample,
                    "schema discovered"
                );
                Ok(run.resolve(schema))
            }
            Err(e) => {
                run.advance(DiscoveryPhase::Failed);
                debug!(application = application_name, trace = ?run.trace, "schema discovery failed");
                Err(e.for_application(application_name))
            }
        }
    }

    /// Fetch and parse the metadata document.
    ///
    /// Every application it describes is cached; the requested one is
    /// returned if present. Siblings without their own retrieval path are
    /// skipped since the engine cannot route to them.
    async fn discover_from_metadata(
        &self,
        application_id: i64,
        retrieval_path: &str,
        connection: &ConnectionDescriptor,
        tenant_id: &str,
    ) -> Result<Option<Arc<ApplicationSchema>>, DiscoveryError> {
        let url = connection.url(&[&self.config.api_prefix, &self.config.metadata_path]);
        let body = self.get(connection, &url).await?;
        let applications = parse_metadata(&body)?;
        debug!(applications = applications.len(), "metadata document parsed");

        let mut requested = None;
        for application in applications {
            if application.application_id == application_id {
                let schema = application.into_schema(retrieval_path)?;
                requested = Some(self.cache.set_schema(tenant_id, schema));
                continue;
            }
            if application.retrieval_path.as_deref().is_none_or(str::is_empty) {
                continue;
            }
            let sibling = application.application_id;
            match application.into_schema("") {
                Ok(schema) => {
                    self.cache.set_schema(tenant_id, schema);
                }
                Err(e) => debug!(application_id = sibling, error = %e, "skipping sibling schema"),
            }
        }
        Ok(requested)
    }

    /// Infer a schema from the first record(s) of the retrieval path.
    async fn discover_from_sample(
        &self,
        application_id: i64,
        application_name: &str,
        retrieval_path: &str,
        connection: &ConnectionDescriptor,
        tenant_id: &str,
    ) -> Result<Arc<ApplicationSchema>, DiscoveryError> {
        let records = self
            .fetch_records(connection, retrieval_path, self.config.discovery_sample_size)
            .await?;

        let options = InferenceOptions {
            include_inactive: self.config.include_inactive,
        };
        let fields = infer_fields_with(&records, options);
        if fields.is_empty() {
            warn!(
                application = application_name,
                records = records.len(),
                "sampled records carried no active fields"
            );
        }

        let schema = ApplicationSchema::new(
            application_id,
            application_name,
            retrieval_path,
            fields,
            SchemaSource::Sample,
        )?;
        Ok(self.cache.set_schema(tenant_id, schema))
    }
}
