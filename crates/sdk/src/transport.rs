//! HTTP JSON-RPC transport layer for the Gleaner SDK.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use gleaner_core::protocol::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use reqwest::{header, Client};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Transport speaking JSON-RPC 2.0 over HTTP POST.
///
/// Every request is posted to the configured endpoint with a fresh UUID id,
/// and the response is matched back against that id before the result
/// payload is released.
#[derive(Debug, Clone)]
pub struct RpcTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl RpcTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> ClientResult<Self> {
        let mut headers = header::HeaderMap::new();

        // Add bearer token header if present
        if let Some(ref token) = config.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ClientError::Config("Invalid token format".to_string()))?,
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Issue a single JSON-RPC call and return the `result` payload.
    pub async fn call(&self, method: &str, params: Value) -> ClientResult<Value> {
        let id = Uuid::new_v4().to_string();
        let request = JsonRpcRequest::new(id.clone(), method, params);
        debug!(endpoint = %self.config.endpoint, method = method, id = %id, "JSON-RPC call");

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        let body = response.text().await?;
        let envelope: JsonRpcResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::Envelope(format!("response is not a JSON-RPC envelope: {}", e)))?;

        unpack(&id, envelope)
    }
}

/// Enforce the envelope invariants and extract the result payload.
///
/// The response must carry the protocol version, exactly one of result and
/// error, and a matching id. An error envelope may carry a null id instead,
/// for servers that could not attribute the failure to a request.
fn unpack(request_id: &str, envelope: JsonRpcResponse) -> ClientResult<Value> {
    if envelope.jsonrpc != JSONRPC_VERSION {
        return Err(ClientError::Envelope(format!(
            "unsupported JSON-RPC version: {:?}",
            envelope.jsonrpc
        )));
    }

    let id_matches = envelope.id.as_str() == Some(request_id);

    match (envelope.result, envelope.error) {
        (Some(_), Some(_)) => Err(ClientError::Envelope(
            "response carries both result and error".to_string(),
        )),
        (None, None) => Err(ClientError::Envelope(
            "response carries neither result nor error".to_string(),
        )),
        (None, Some(error)) => {
            if !id_matches && !envelope.id.is_null() {
                return Err(ClientError::Envelope(format!(
                    "error response id {} does not match request id {:?}",
                    envelope.id, request_id
                )));
            }
            Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            })
        }
        (Some(result), None) => {
            if !id_matches {
                return Err(ClientError::Envelope(format!(
                    "response id {} does not match request id {:?}",
                    envelope.id, request_id
                )));
            }
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

    fn create_config(base_uri: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            endpoint: url::Url::parse(&format!("{}/rpc", base_uri)).unwrap(),
            token: None,
            timeout: Duration::from_secs(5),
        })
    }

    fn create_config_with_token(base_uri: &str, token: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            endpoint: url::Url::parse(&format!("{}/rpc", base_uri)).unwrap(),
            token: Some(token.to_string()),
            timeout: Duration::from_secs(5),
        })
    }

    /// Responder that echoes the caller's request id, the way a real
    /// endpoint would. Static templates cannot do this because the id is
    /// generated per call.
    struct EchoResult(Value);

    impl Respond for EchoResult {
        fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
            let envelope: Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": envelope["id"],
                "result": self.0,
            }))
        }
    }

    struct EchoError {
        code: i32,
        message: &'static str,
    }

    impl Respond for EchoError {
        fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
            let envelope: Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": envelope["id"],
                "error": { "code": self.code, "message": self.message },
            }))
        }
    }

    #[tokio::test]
    async fn test_call_returns_result_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(EchoResult(json!({ "rows": [1, 2, 3] })))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let result = transport.call("tools/list", json!({})).await.unwrap();
        assert_eq!(result, json!({ "rows": [1, 2, 3] }));
    }

    #[tokio::test]
    async fn test_request_carries_version_method_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(wiremock::matchers::body_partial_json(json!({
                "jsonrpc": "2.0",
                "method": "tools/call",
                "params": { "name": "run_splunk_query" }
            })))
            .respond_with(EchoResult(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        transport
            .call("tools/call", json!({ "name": "run_splunk_query", "arguments": {} }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bearer_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .respond_with(EchoResult(json!({ "ok": true })))
            .mount(&server)
            .await;

        let transport =
            RpcTransport::new(create_config_with_token(&server.uri(), "sk-test-key")).unwrap();
        let result = transport.call("tools/list", json!({})).await.unwrap();
        assert_eq!(result["ok"], true);
    }

    #[tokio::test]
    async fn test_http_500_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        assert!(err.is_transport());
        assert!(!err.is_protocol());
        match err {
            ClientError::Status { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_400_parses_structured_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid JSON-RPC request",
                "details": "expected value at line 1 column 1"
            })))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        match err {
            ClientError::Status {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid JSON-RPC request");
                assert!(details.unwrap().contains("line 1"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rpc_error_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(EchoError {
                code: -32602,
                message: "Unknown tool: nope",
            })
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/call", json!({})).await.unwrap_err();
        assert!(err.is_protocol());
        assert!(!err.is_transport());
        match err {
            ClientError::Rpc { code, message, .. } => {
                assert_eq!(code, -32602);
                assert_eq!(message, "Unknown tool: nope");
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mismatched_response_id_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "somebody-else",
                "result": {}
            })))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        match err {
            ClientError::Envelope(message) => assert!(message.contains("does not match")),
            other => panic!("expected Envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_envelope_with_null_id_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": { "code": -32603, "message": "boom" }
            })))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Rpc { code: -32603, .. }));
    }

    #[tokio::test]
    async fn test_both_result_and_error_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "x",
                "result": {},
                "error": { "code": -32603, "message": "boom" }
            })))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        match err {
            ClientError::Envelope(message) => assert!(message.contains("both result and error")),
            other => panic!("expected Envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_neither_result_nor_error_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": "x" })),
            )
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        match err {
            ClientError::Envelope(message) => {
                assert!(message.contains("neither result nor error"))
            }
            other => panic!("expected Envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Envelope(_)));
        assert!(err.is_protocol());
    }

    #[tokio::test]
    async fn test_wrong_version_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "1.0",
                "id": "x",
                "result": {}
            })))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(create_config(&server.uri())).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        match err {
            ClientError::Envelope(message) => {
                assert!(message.contains("unsupported JSON-RPC version"))
            }
            other => panic!("expected Envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": "x", "result": {} }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = Arc::new(ClientConfig {
            endpoint: url::Url::parse(&format!("{}/rpc", server.uri())).unwrap(),
            token: None,
            timeout: Duration::from_millis(50),
        });
        let transport = RpcTransport::new(config).unwrap();
        let err = transport.call("tools/list", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
        assert!(err.is_transport());
    }
}
