// Shared transport configuration for building reqwest::Client instances.
//
// Keeps timeout and header wiring out of the API client so its
// constructor stays focused on auth and base-URL handling.

use std::time::Duration;

/// Transport configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. Exceeding it surfaces as a transport error.
    pub timeout: Duration,
}

/// Vendor-documented request timeout for the cloud API.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    ///
    /// Used by [`WebApiClient`](crate::WebApiClient) to inject the
    /// `Authorization` header on every request.
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("latchkey/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?)
    }
}
