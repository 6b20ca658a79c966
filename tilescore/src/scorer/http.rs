//! HTTP client abstraction for testability

use super::types::ScorerError;
use std::future::Future;
use tracing::{trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. Non-blocking I/O via
/// async/await keeps every pool worker's request in flight concurrently.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP POST with a binary body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Slice of (header_name, header_value) tuples
    /// * `body` - Raw request body bytes
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn post_octet_stream(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, ScorerError>> + Send;
}

/// Async HTTP client implementation using reqwest.
///
/// Keeps a small warm connection pool so repeated posts to the same
/// prediction host skip connection setup.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, ScorerError> {
        Self::with_timeout(30)
    }

    /// Creates a new AsyncReqwestClient with custom request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ScorerError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            // Connection pooling - keep connections alive for parallel requests
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            // TCP optimizations
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                ScorerError::HttpError(format!("Failed to create async HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn post_octet_stream(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ScorerError> {
        trace!(url = url, bytes = body.len(), "HTTP POST request starting");

        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ScorerError::HttpError(format!("Request failed: {}", e)));
            }
        };

        // Check HTTP status
        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ScorerError::HttpError(format!(
                "HTTP {} from POST {}",
                response.status(),
                url
            )));
        }

        // Read response body
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ScorerError::HttpError(format!("Failed to read response: {}", e)))
    }
}
