// HTTP JSON-RPC surface of the reference server
//
// Framing rules: a request that never forms a JSON-RPC envelope (unparseable
// body, wrong protocol version) gets a plain HTTP 400 with an `error` body.
// Once an envelope exists, every fault travels back as a JSON-RPC error
// object over HTTP 200 so the caller can recover the request id.

use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use gleaner_core::protocol::{
    CallToolParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCatalog, JSONRPC_VERSION,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Reference server emulating a remote tool endpoint.
pub struct ReferenceServer {
    registry: Arc<ToolRegistry>,
}

impl ReferenceServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The axum application. Exposed so tests can drive it in-process.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/rpc", post(handle_rpc))
            .layer(TraceLayer::new_for_http())
            .with_state(self.registry.clone())
    }

    /// Bind and serve until shutdown.
    pub async fn serve(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("reference server listening on {}", addr);
        axum::serve(listener, self.router())
            .await
            .context("reference server terminated")
    }
}

async fn handle_rpc(State(registry): State<Arc<ToolRegistry>>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let body = ErrorResponse::with_details("invalid JSON-RPC request", err.to_string());
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        let body = ErrorResponse::new(format!(
            "unsupported JSON-RPC version: {:?}",
            request.jsonrpc
        ));
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let response = dispatch(&registry, request).await;
    (StatusCode::OK, Json(response)).into_response()
}

/// Route a well-formed request to its method handler.
async fn dispatch(registry: &ToolRegistry, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id_or_null();
    tracing::debug!(method = %request.method, "dispatching request");

    match request.method.as_str() {
        "tools/list" => {
            let catalog = ToolCatalog {
                tools: registry.descriptors(),
            };
            match serde_json::to_value(catalog) {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(err) => {
                    JsonRpcResponse::error(id, JsonRpcError::internal_error(err.to_string()))
                }
            }
        }
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            let call: CallToolParams = match serde_json::from_value(params) {
                Ok(call) => call,
                Err(err) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("invalid tool call params: {}", err)),
                    )
                }
            };
            let tool = match registry.get(&call.name) {
                Some(tool) => tool,
                None => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Unknown tool: {}", call.name)),
                    )
                }
            };
            match tool.execute(call.arguments).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(err) => {
                    tracing::warn!(tool = %call.name, error = %err, "tool execution failed");
                    JsonRpcResponse::error(id, JsonRpcError::internal_error(err.to_string()))
                }
            }
        }
        other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
    }
}

/// Error body for requests that never reached the JSON-RPC layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::SplQueryTool;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(SplQueryTool::new("run_splunk_query")));
        ReferenceServer::new(registry).router()
    }

    async fn post_raw(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rpc")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_rpc(app: Router, body: Value) -> (StatusCode, Value) {
        post_raw(app, body.to_string()).await
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (status, body) = post_rpc(
            test_router(),
            json!({ "jsonrpc": "2.0", "id": "list-1", "method": "tools/list" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], "list-1");
        assert_eq!(body["result"]["tools"][0]["name"], "run_splunk_query");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_call_tool_serves_probe_rows() {
        let (status, body) = post_rpc(
            test_router(),
            json!({
                "jsonrpc": "2.0",
                "id": "call-1",
                "method": "tools/call",
                "params": {
                    "name": "run_splunk_query",
                    "arguments": { "query": "index=notable earliest=-30d | head 5" }
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "call-1");
        assert_eq!(body["result"]["query_kind"], "discovery_probe");
        assert_eq!(body["result"]["rows"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_call_tool_serves_export_rows() {
        let (_, body) = post_rpc(
            test_router(),
            json!({
                "jsonrpc": "2.0",
                "id": "call-2",
                "method": "tools/call",
                "params": {
                    "name": "run_splunk_query",
                    "arguments": { "query": "index=notable earliest=-90d | head 100" }
                }
            }),
        )
        .await;
        assert_eq!(body["result"]["query_kind"], "export");
        assert_eq!(body["result"]["rows"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let (status, body) = post_rpc(
            test_router(),
            json!({
                "jsonrpc": "2.0",
                "id": "call-3",
                "method": "tools/call",
                "params": { "name": "no_such_tool", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(body["error"]["message"], "Unknown tool: no_such_tool");
        assert!(body.get("result").is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (status, body) = post_rpc(
            test_router(),
            json!({ "jsonrpc": "2.0", "id": "m-1", "method": "tools/destroy" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["error"]["message"], "Method not found: tools/destroy");
    }

    #[tokio::test]
    async fn test_malformed_body_is_http_400() {
        let (status, body) = post_raw(test_router(), "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("invalid JSON-RPC request"));
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_version_is_http_400() {
        let (status, body) = post_rpc(
            test_router(),
            json!({ "jsonrpc": "1.0", "id": "v-1", "method": "tools/list" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("unsupported JSON-RPC version"));
    }

    #[tokio::test]
    async fn test_non_object_params_is_invalid_params() {
        let (status, body) = post_rpc(
            test_router(),
            json!({ "jsonrpc": "2.0", "id": "p-1", "method": "tools/call", "params": 42 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_missing_params_is_invalid_params() {
        let (_, body) = post_rpc(
            test_router(),
            json!({ "jsonrpc": "2.0", "id": "p-2", "method": "tools/call" }),
        )
        .await;
        assert_eq!(body["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_missing_id_echoes_null() {
        let (status, body) = post_rpc(
            test_router(),
            json!({ "jsonrpc": "2.0", "method": "tools/list" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].is_null());
        assert!(body.get("result").is_some());
    }

    struct FailingTool;

    #[async_trait::async_trait]
    impl crate::tools::Tool for FailingTool {
        fn descriptor(&self) -> gleaner_core::protocol::ToolDescriptor {
            gleaner_core::protocol::ToolDescriptor {
                name: "failing_tool".to_string(),
                description: "always fails".to_string(),
                input_schema: json!({ "type": "object" }),
            }
        }

        async fn execute(&self, _arguments: Value) -> Result<Value> {
            anyhow::bail!("backend unavailable")
        }
    }

    #[tokio::test]
    async fn test_tool_failure_is_internal_error() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool));
        let app = ReferenceServer::new(registry).router();
        let (status, body) = post_rpc(
            app,
            json!({
                "jsonrpc": "2.0",
                "id": "f-1",
                "method": "tools/call",
                "params": { "name": "failing_tool", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32603);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("backend unavailable"));
    }
}
