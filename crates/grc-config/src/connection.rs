//! Target system connection configuration.

use grc_core::entities::ConnectionDescriptor;
use serde::{Deserialize, Serialize};

/// Default tenant partition when none is configured.
fn default_tenant_id() -> String {
    String::from("default")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Base address of the GRC instance (e.g., `https://grc.example.com`).
    #[serde(default)]
    pub base_url: String,

    /// Session credential issued by the session-management service.
    #[serde(default)]
    pub session_token: String,

    /// Instance identifier of the GRC deployment.
    #[serde(default)]
    pub instance_id: String,

    /// Tenant partition used for cache keys.
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            session_token: String::new(),
            instance_id: String::new(),
            tenant_id: default_tenant_id(),
        }
    }
}

impl ConnectionConfig {
    /// Check if the connection has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.session_token.is_empty()
    }

    /// Build the descriptor the discovery client consumes.
    #[must_use]
    pub fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(&self.base_url, &self.session_token, &self.instance_id)
    }
}
