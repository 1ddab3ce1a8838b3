//! Probe a tool endpoint: list its tools and run the discovery query.
//!
//! Start the reference server first (cargo run --bin gleaner-mock), then:
//! Run with: cargo run --example list_tools

use gleaner_core::spl::DEFAULT_DISCOVERY_SPL;
use gleaner_sdk::{ClientResult, GleanerClient};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> ClientResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8765/rpc".to_string());

    let client = GleanerClient::builder()
        .endpoint(&endpoint)
        .timeout(Duration::from_secs(10))
        .build()?;

    // Discover the advertised tools
    println!("Listing tools at {endpoint}...");
    let catalog = client.list_tools().await?;
    println!("Found {} tools", catalog.tools.len());
    for tool in &catalog.tools {
        println!("  {}: {}", tool.name, tool.description);
    }

    // Run the discovery probe through the first tool
    if let Some(tool) = catalog.tools.first() {
        println!("\nRunning discovery probe through {}...", tool.name);
        let result = client
            .call_tool(&tool.name, json!({ "query": DEFAULT_DISCOVERY_SPL }))
            .await?;
        let rows = result["rows"].as_array().map(Vec::len).unwrap_or(0);
        println!("Probe returned {rows} rows");
    }

    Ok(())
}
