//! Retrieval-path listing per tenant.

use std::sync::Arc;

use grc_core::entities::ConnectionDescriptor;
use tracing::{debug, info};

use crate::SchemaDiscovery;
use crate::error::DiscoveryError;
use crate::metadata::parse_endpoints;

impl SchemaDiscovery {
    /// List the retrieval paths the tenant's instance exposes.
    ///
    /// Served from the endpoint cache when possible; otherwise the service
    /// document at the API root is fetched, parsed, and cached.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Endpoints`] naming `tenant_id` on any transport,
    /// status, timeout, or format failure. There is no fallback.
    pub async fn get_available_endpoints(
        &self,
        connection: &ConnectionDescriptor,
        tenant_id: &str,
    ) -> Result<Arc<Vec<String>>, DiscoveryError> {
        if let Some(endpoints) = self.cache.get_endpoints(tenant_id) {
            debug!(tenant = tenant_id, "endpoint cache hit");
            return Ok(endpoints);
        }

        let endpoints = self
            .fetch_endpoints(connection)
            .await
            .map_err(|e| DiscoveryError::Endpoints {
                tenant: tenant_id.to_string(),
                source: Box::new(e),
            })?;

        info!(tenant = tenant_id, count = endpoints.len(), "endpoints discovered");
        Ok(self.cache.set_endpoints(tenant_id, endpoints))
    }

    async fn fetch_endpoints(
        &self,
        connection: &ConnectionDescriptor,
    ) -> Result<Vec<String>, DiscoveryError> {
        let url = connection.url(&[&self.config.api_prefix]);
        let body = self.get(connection, &url).await?;
        parse_endpoints(&body)
    }
}
