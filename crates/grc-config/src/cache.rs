//! Schema cache sizing and expiry.

use serde::{Deserialize, Serialize};

/// 24 hours.
const fn default_ttl_secs() -> u64 {
    86_400
}

const fn default_schema_capacity() -> usize {
    500
}

const fn default_endpoint_capacity() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Lifetime of a cached schema or endpoint list, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum cached schemas across all tenants.
    #[serde(default = "default_schema_capacity")]
    pub schema_capacity: usize,

    /// Maximum cached endpoint lists (one per tenant).
    #[serde(default = "default_endpoint_capacity")]
    pub endpoint_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            schema_capacity: default_schema_capacity(),
            endpoint_capacity: default_endpoint_capacity(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}
