use std::sync::Arc;

use anyhow::Context;
use grc_config::GrcConfig;
use grc_core::entities::ConnectionDescriptor;
use grc_discovery::{SchemaCache, SchemaDiscovery};

use crate::cli::GlobalFlags;

/// Everything a command handler needs, built once per invocation.
pub struct AppContext {
    pub config: GrcConfig,
    pub discovery: SchemaDiscovery,
    pub tenant_id: String,
}

impl AppContext {
    pub fn init(config: GrcConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        let cache = Arc::new(SchemaCache::new(&config.cache));
        let discovery = SchemaDiscovery::new(&config.discovery, cache)
            .context("failed to build discovery client")?;
        let tenant_id = flags
            .tenant
            .clone()
            .unwrap_or_else(|| config.connection.tenant_id.clone());

        Ok(Self {
            config,
            discovery,
            tenant_id,
        })
    }

    /// The configured connection, or an error explaining what to set.
    pub fn connection(&self) -> anyhow::Result<ConnectionDescriptor> {
        let connection = self.config.require_connection().context(
            "set GRC_CONNECTION__BASE_URL and GRC_CONNECTION__SESSION_TOKEN (or .grc/config.toml)",
        )?;
        Ok(connection.descriptor())
    }
}
