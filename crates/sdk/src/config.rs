//! Configuration types for the Gleaner SDK.

use std::time::Duration;
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the tool-endpoint client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the JSON-RPC endpoint. Every request is POSTed here
    /// unchanged; no path joining happens on top of it.
    pub endpoint: Url,
    /// Bearer token attached to every request.
    pub token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration for the given endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
