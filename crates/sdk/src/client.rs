//! Main client for the Gleaner SDK.

use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::{ClientError, ClientResult};
use crate::transport::RpcTransport;
use gleaner_core::protocol::ToolCatalog;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for a remote tool endpoint speaking JSON-RPC 2.0 over HTTP.
#[derive(Debug, Clone)]
pub struct GleanerClient {
    transport: RpcTransport,
}

impl GleanerClient {
    /// Create a new client builder.
    pub fn builder() -> GleanerClientBuilder {
        GleanerClientBuilder::new()
    }

    /// Create a client from configuration.
    fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let transport = RpcTransport::new(Arc::new(config))?;
        Ok(Self { transport })
    }

    /// Discover the tools the endpoint advertises.
    pub async fn list_tools(&self) -> ClientResult<ToolCatalog> {
        let result = self.transport.call("tools/list", json!({})).await?;
        serde_json::from_value(result).map_err(|e| {
            ClientError::Envelope(format!("tools/list result has unexpected shape: {}", e))
        })
    }

    /// Invoke a named tool.
    ///
    /// `arguments` is passed through unmodified and the endpoint's result
    /// payload comes back verbatim; the client imposes no schema on either.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ClientResult<Value> {
        self.transport
            .call(
                "tools/call",
                json!({ "name": name, "arguments": arguments }),
            )
            .await
    }
}

/// Builder for creating a GleanerClient.
pub struct GleanerClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Duration,
}

impl GleanerClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the full URL of the JSON-RPC endpoint.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Set the bearer token for authentication.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> ClientResult<GleanerClient> {
        let endpoint_str = self
            .endpoint
            .ok_or_else(|| ClientError::Config("endpoint is required".to_string()))?;

        let endpoint = Url::parse(&endpoint_str)?;

        let config = ClientConfig {
            endpoint,
            token: self.token,
            timeout: self.timeout,
        };

        GleanerClient::from_config(config)
    }
}

impl Default for GleanerClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
