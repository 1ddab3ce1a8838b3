//! # Gleaner SDK
//!
//! Rust client for MCP-style tool endpoints speaking JSON-RPC 2.0 over HTTP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gleaner_sdk::{ClientResult, GleanerClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> ClientResult<()> {
//!     // Build client
//!     let client = GleanerClient::builder()
//!         .endpoint("http://127.0.0.1:8765/rpc")
//!         .token("dev-token")
//!         .build()?;
//!
//!     // Discover the advertised tools
//!     let catalog = client.list_tools().await?;
//!     println!("{} tools available", catalog.tools.len());
//!
//!     // Run a query through the SPL execution tool
//!     let result = client
//!         .call_tool("run_splunk_query", json!({ "query": "index=notable | head 5" }))
//!         .await?;
//!     println!("rows: {}", result["rows"]);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{GleanerClient, GleanerClientBuilder};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

// Re-export the wire types callers see in results and errors
pub use gleaner_core::protocol::{JsonRpcError, ToolCatalog, ToolDescriptor};
