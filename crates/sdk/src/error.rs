//! Error types for the Gleaner SDK.
//!
//! Failures split into two families. Transport errors mean the HTTP exchange
//! itself broke: connection failures, timeouts, non-success status codes.
//! Protocol errors mean HTTP succeeded but the JSON-RPC layer did not: the
//! endpoint returned an error object, or the body was not a valid envelope.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types that can occur when talking to a tool endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Endpoint answered outside the 2xx range.
    #[error("endpoint returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The response envelope carried a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i32,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// The response body was not a valid JSON-RPC envelope.
    #[error("invalid JSON-RPC envelope: {0}")]
    Envelope(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// True when the HTTP layer itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout | Self::Status { .. }
        )
    }

    /// True when HTTP succeeded but the JSON-RPC layer did not.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Rpc { .. } | Self::Envelope(_))
    }

    /// Create a status error from a non-success response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        // Endpoints serve a structured {error, details?} body where they can
        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
            Self::Status {
                status,
                message: error_response.error,
                details: error_response.details,
            }
        } else {
            Self::Status {
                status,
                message: body.to_string(),
                details: None,
            }
        }
    }
}

/// Structured error body served for requests that never reached the JSON-RPC
/// layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
