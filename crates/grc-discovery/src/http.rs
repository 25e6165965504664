//! Shared HTTP helpers for discovery requests.
//!
//! Every call to the target goes through [`get_text`], so the metadata, sample
//! and endpoint paths share one timeout bound and one status mapping and only
//! see response bodies.

use std::time::Duration;

use grc_core::entities::ConnectionDescriptor;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};

use crate::error::DiscoveryError;

/// Seconds to wait when the target throttles without a usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Turn a GRC answer into either a readable response or a discovery error.
///
/// A throttled call (429) becomes [`DiscoveryError::RateLimited`]. Any other
/// non-2xx status becomes [`DiscoveryError::Api`] carrying the body, which
/// the target uses for its error text.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, DiscoveryError> {
    match resp.status() {
        status if status.is_success() => Ok(resp),
        StatusCode::TOO_MANY_REQUESTS => Err(DiscoveryError::RateLimited {
            retry_after_secs: retry_after_secs(&resp),
        }),
        status => Err(DiscoveryError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        }),
    }
}

/// Throttle window from `Retry-After` in delta-seconds form.
fn retry_after_secs(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// GET `url` with the session's authorization and return the body text.
///
/// The whole exchange (connect, status, body) is bounded by `timeout`; on
/// expiry the request is dropped and [`DiscoveryError::Timeout`] returned.
pub async fn get_text(
    http: &reqwest::Client,
    connection: &ConnectionDescriptor,
    url: &str,
    timeout: Duration,
) -> Result<String, DiscoveryError> {
    let exchange = async {
        let resp = http
            .get(url)
            .header(AUTHORIZATION, connection.authorization())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let resp = check_response(resp).await?;
        Ok::<_, DiscoveryError>(resp.text().await?)
    };

    match tokio::time::timeout(timeout, exchange).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(DiscoveryError::Http(e))) if e.is_timeout() => Err(timed_out(url, timeout)),
        Ok(Err(e)) => Err(e),
        Err(_elapsed) => Err(timed_out(url, timeout)),
    }
}

fn timed_out(url: &str, timeout: Duration) -> DiscoveryError {
    DiscoveryError::Timeout {
        url: url.to_string(),
        timeout_secs: timeout.as_secs(),
    }
}

/// Percent-encode each segment of a retrieval path, keeping `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn throttle_window_read_from_header() {
        let resp = mock_response_with_retry_after(429, "120");
        assert_eq!(retry_after_secs(&resp), 120);
    }

    #[test]
    fn throttle_window_defaults_without_header() {
        assert_eq!(retry_after_secs(&mock_response(429)), 60);
    }

    #[test]
    fn throttle_window_defaults_for_http_date() {
        let resp = mock_response_with_retry_after(429, "Wed, 21 Oct 2026 07:28:00 GMT");
        assert_eq!(retry_after_secs(&resp), 60);
    }

    #[tokio::test]
    async fn check_response_rate_limited() {
        let resp = mock_response_with_retry_after(429, "30");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn check_response_not_found() {
        let resp = mock_response(404);
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn server_error_keeps_body_as_message() {
        let resp = reqwest::Response::from(
            ::http::Response::builder()
                .status(500)
                .body("session expired")
                .unwrap(),
        );
        match check_response(resp).await.unwrap_err() {
            DiscoveryError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "session expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200);
        assert!(check_response(resp).await.is_ok());
    }

    #[test]
    fn encode_path_keeps_separators() {
        assert_eq!(encode_path("Risk_Register"), "Risk_Register");
        assert_eq!(encode_path("Third Party/Profiles"), "Third%20Party/Profiles");
    }
}
