//! Discovery request configuration.

use serde::{Deserialize, Serialize};

/// Per-request timeout for metadata, sample, and endpoint fetches.
const fn default_timeout_secs() -> u64 {
    30
}

fn default_api_prefix() -> String {
    String::from("contentapi")
}

fn default_metadata_path() -> String {
    String::from("$metadata")
}

const fn default_discovery_sample_size() -> u32 {
    1
}

const fn default_validation_sample_size() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Timeout applied to each outbound request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path prefix of the record API under the base address.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Path of the metadata document under the API prefix.
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,

    /// Records requested when inferring a schema from samples.
    #[serde(default = "default_discovery_sample_size")]
    pub discovery_sample_size: u32,

    /// Records requested when validating a schema against live data.
    #[serde(default = "default_validation_sample_size")]
    pub validation_sample_size: u32,

    /// Keep fields that never carried a value in the sampled records.
    #[serde(default)]
    pub include_inactive: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            api_prefix: default_api_prefix(),
            metadata_path: default_metadata_path(),
            discovery_sample_size: default_discovery_sample_size(),
            validation_sample_size: default_validation_sample_size(),
            include_inactive: false,
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
