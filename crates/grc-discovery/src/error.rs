//! Discovery error types.

use grc_core::errors::CoreError;
use thiserror::Error;

/// Errors that can occur while discovering or validating a schema.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The target system returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the target system.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The target system returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A response body that should be JSON could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A metadata or endpoint-list body is in a format the engine does not read.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The sample request succeeded but carried no records.
    #[error("no records returned from '{path}'")]
    NoRecords { path: String },

    /// Assembling the schema failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Discovery or validation for one application failed.
    #[error("schema discovery failed for application '{application}': {source}")]
    Application {
        application: String,
        #[source]
        source: Box<DiscoveryError>,
    },

    /// Listing the available retrieval paths for a tenant failed.
    #[error("endpoint discovery failed for tenant '{tenant}': {source}")]
    Endpoints {
        tenant: String,
        #[source]
        source: Box<DiscoveryError>,
    },
}

impl DiscoveryError {
    /// Wrap `self` with the application it was raised for.
    #[must_use]
    pub fn for_application(self, application: &str) -> Self {
        Self::Application {
            application: application.to_string(),
            source: Box::new(self),
        }
    }

    /// Whether re-invoking the failed call might succeed.
    ///
    /// Transport failures, timeouts, rate limiting, and server-side errors
    /// are transient; malformed or empty data is not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Application { source, .. } | Self::Endpoints { source, .. } => {
                source.is_transient()
            }
            Self::Parse(_) | Self::UnsupportedFormat(_) | Self::NoRecords { .. } | Self::Core(_) => {
                false
            }
        }
    }
}
