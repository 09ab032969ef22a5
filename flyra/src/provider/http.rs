//! HTTP client abstraction for testability.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::ProviderError;

/// Default per-call timeout for upstream requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A raw HTTP response: status code plus body bytes.
///
/// The provider client classifies status codes itself (404 vs 429 vs
/// 5xx carry different meanings), so the transport layer reports
/// non-success statuses as data, not as errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for asynchronous HTTP transport.
///
/// This abstraction allows dependency injection of mock transports in
/// tests. Transport-level failures (connect errors, timeouts) surface
/// as [`ProviderError`]; HTTP error statuses come back as responses.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async GET request with Bearer token authentication.
    fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<HttpResponse, ProviderError>> + Send;
}

/// Async HTTP client implementation using reqwest.
///
/// Uses a reusable client with connection pooling and a bounded
/// per-call timeout.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-call timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                ProviderError::Unavailable(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<HttpResponse, ProviderError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) if e.is_timeout() => {
                warn!(url = url, timeout = ?self.timeout, "HTTP request timed out");
                return Err(ProviderError::Timeout(self.timeout));
            }
            Err(e) => {
                warn!(url = url, error = %e, "HTTP request failed");
                return Err(ProviderError::Unavailable(format!("request failed: {}", e)));
            }
        };

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            warn!(url = url, error = %e, "Failed to read response body");
            ProviderError::Unavailable(format!("failed to read response: {}", e))
        })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
