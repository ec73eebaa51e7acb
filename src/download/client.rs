//! HTTP client wrapper for fetching downloadable resources.
//!
//! This module provides the `HttpClient` struct which issues GET requests
//! with proper timeout configuration and maps transport failures into
//! [`DownloadError`] at the seam.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tracing::debug;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;

/// HTTP client for fetching files with streaming support.
///
/// This client is designed to be created once and reused for multiple
/// downloads, taking advantage of connection pooling. Tests inject one with
/// shorter timeouts via [`DownloadManager::with_client`].
///
/// [`DownloadManager::with_client`]: crate::manager::DownloadManager::with_client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A successfully opened response, ready to be streamed.
#[derive(Debug)]
pub struct FetchedResource {
    content_length: Option<u64>,
    response: reqwest::Response,
}

impl FetchedResource {
    /// Declared body size parsed from the Content-Length header, when the
    /// header is present and is a valid integer.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Consumes the resource, returning the underlying response for
    /// streaming.
    #[must_use]
    pub fn into_inner(self) -> reqwest::Response {
        self.response
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Issues a GET request and validates the response status.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Timeout`] when the request times out,
    /// [`DownloadError::Network`] for other transport failures, and
    /// [`DownloadError::HttpStatus`] for non-success responses.
    pub async fn fetch(&self, url: &str) -> Result<FetchedResource, DownloadError> {
        debug!(url = %url, "requesting resource");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        Ok(FetchedResource {
            content_length,
            response,
        })
    }
}

/// Default User-Agent identifying the tool (name/version).
fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("fetchqueue/{version}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_user_agent_contains_crate_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("fetchqueue/"), "unexpected UA: {ua}");
        assert!(
            ua.contains(env!("CARGO_PKG_VERSION")),
            "UA must contain crate version: {ua}"
        );
    }

    #[tokio::test]
    async fn test_fetch_success_reports_content_length() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"0123456789".to_vec()))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/file.bin", mock_server.uri());
        let resource = client.fetch(&url).await.unwrap();

        assert_eq!(resource.content_length(), Some(10));
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.bin"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/missing.bin", mock_server.uri());
        let result = client.fetch(&url).await;

        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus(404), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_slow_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.bin"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"data".to_vec())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new_with_timeouts(5, 1);
        let url = format!("{}/slow.bin", mock_server.uri());
        let result = client.fetch(&url).await;

        assert!(
            matches!(result, Err(DownloadError::Timeout { .. })),
            "Expected Timeout, got: {result:?}"
        );
    }
}
