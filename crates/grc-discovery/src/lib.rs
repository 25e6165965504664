//! # grc-discovery
//!
//! Schema discovery, caching, and live validation against a GRC record store.
//!
//! [`SchemaDiscovery`] resolves an application's schema in three steps:
//! - the shared [`SchemaCache`], keyed by tenant and application
//! - the metadata endpoint, when it answers with a document the engine reads
//! - one sampled record from the application's retrieval path
//!
//! Metadata failures of any kind fall through to sampling. Sampling failures
//! are terminal for the call and carry the application name. Every request
//! is bounded by the configured timeout.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use grc_config::GrcConfig;
//! use grc_discovery::{SchemaCache, SchemaDiscovery};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = GrcConfig::load()?;
//! let connection = config.require_connection()?.descriptor();
//! let cache = Arc::new(SchemaCache::new(&config.cache));
//! let discovery = SchemaDiscovery::new(&config.discovery, cache)?;
//!
//! let schema = discovery
//!     .get_application_schema(12, "Risk Register", "Risk_Register", &connection, "default")
//!     .await?;
//! println!("{} fields", schema.fields.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod discovery;
pub mod endpoints;
pub mod metadata;
pub mod validation;

mod error;
mod http;

pub use cache::{CacheStats, SchemaCache};
pub use discovery::DiscoveryOutcome;
pub use error::DiscoveryError;

use std::sync::Arc;

use grc_config::DiscoveryConfig;
use grc_core::entities::ConnectionDescriptor;
use serde_json::Value;

// ── Client ─────────────────────────────────────────────────────────

/// Discovers, caches, and validates application schemas.
///
/// Cheap to share: the HTTP client pools connections and the cache sits
/// behind an [`Arc`].
pub struct SchemaDiscovery {
    http: reqwest::Client,
    cache: Arc<SchemaCache>,
    config: DiscoveryConfig,
}

impl SchemaDiscovery {
    /// Create a discovery client that stores results in `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &DiscoveryConfig, cache: Arc<SchemaCache>) -> Result<Self, DiscoveryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("grc-schema/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            cache,
            config: config.clone(),
        })
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    #[must_use]
    pub const fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Drop every cached schema and endpoint list.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// URL of a resource under the record API.
    fn api_url(&self, connection: &ConnectionDescriptor, path: &str) -> String {
        connection.url(&[&self.config.api_prefix, &http::encode_path(path)])
    }

    async fn get(
        &self,
        connection: &ConnectionDescriptor,
        url: &str,
    ) -> Result<String, DiscoveryError> {
        http::get_text(&self.http, connection, url, self.config.timeout()).await
    }

    /// Fetch up to `top` records from `retrieval_path`.
    ///
    /// # Errors
    ///
    /// Transport, status, and timeout failures as for any request, plus
    /// [`DiscoveryError::NoRecords`] when the response carries no records.
    pub async fn fetch_records(
        &self,
        connection: &ConnectionDescriptor,
        retrieval_path: &str,
        top: u32,
    ) -> Result<Vec<Value>, DiscoveryError> {
        let url = format!("{}?$top={top}", self.api_url(connection, retrieval_path));
        tracing::debug!(%url, top, "fetching sample records");
        let body = self.get(connection, &url).await?;
        metadata::parse_records(&body, retrieval_path)
    }
}
