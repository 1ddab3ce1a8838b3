//! Build one labeled export query and run it through the endpoint.
//!
//! Start the reference server first (cargo run --bin gleaner-mock), then:
//! Run with: cargo run --example export_query

use gleaner_core::spl::build_export_spl;
use gleaner_core::{Label, Rule};
use gleaner_sdk::{ClientResult, GleanerClient};
use serde_json::json;

#[tokio::main]
async fn main() -> ClientResult<()> {
    tracing_subscriber::fmt::init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8765/rpc".to_string());

    let client = GleanerClient::builder().endpoint(&endpoint).build()?;

    // A single-label slice of a mapping document
    let label = Label::new("C2");
    let rules = vec![
        Rule::new("rule_name", vec!["C2 Beaconing".to_string()]),
        Rule::new("mitre_tactic", vec!["command-and-control".to_string()]),
    ];

    let spl = build_export_spl("index=notable earliest=-90d", &label, &rules, 100);
    println!("Export query for {label}:\n{spl}\n");

    let result = client
        .call_tool("run_splunk_query", json!({ "query": spl }))
        .await?;
    println!("{result:#}");

    Ok(())
}
