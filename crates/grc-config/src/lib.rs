//! # grc-config
//!
//! Layered configuration loading for the GRC schema engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GRC_*` prefix, `__` as separator)
//! 2. Project-level `.grc/config.toml`
//! 3. User-level `~/.config/grc/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GRC_CONNECTION__BASE_URL` -> `connection.base_url`,
//! `GRC_CACHE__TTL_SECS` -> `cache.ttl_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use grc_config::GrcConfig;
//!
//! let config = GrcConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//!
//! if config.connection.is_configured() {
//!     println!("GRC instance: {}", config.connection.base_url);
//! }
//! ```

mod cache;
mod connection;
mod discovery;
mod error;

pub use cache::CacheConfig;
pub use connection::ConnectionConfig;
pub use discovery::DiscoveryConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GrcConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl GrcConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be read or a value
    /// has the wrong shape.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or layer extra
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".grc/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("GRC_").split("__"))
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero timeouts, zero cache
    /// capacities, or zero sample sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&str, bool); 5] = [
            ("discovery.timeout_secs", self.discovery.timeout_secs == 0),
            (
                "discovery.discovery_sample_size",
                self.discovery.discovery_sample_size == 0,
            ),
            (
                "discovery.validation_sample_size",
                self.discovery.validation_sample_size == 0,
            ),
            ("cache.schema_capacity", self.cache.schema_capacity == 0),
            ("cache.endpoint_capacity", self.cache.endpoint_capacity == 0),
        ];

        match checks.iter().find(|(_, invalid)| *invalid) {
            Some((field, _)) => Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Require the connection section to be filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the base URL or session
    /// token is missing.
    pub fn require_connection(&self) -> Result<&ConnectionConfig, ConfigError> {
        if self.connection.is_configured() {
            Ok(&self.connection)
        } else {
            Err(ConfigError::NotConfigured {
                section: "connection".to_string(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("grc").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or falls back to the
    /// current dir. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
