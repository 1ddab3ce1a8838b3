// Standalone reference server binary

use anyhow::Result;
use clap::Parser;
use gleaner_mcp::tools::{SplQueryTool, ToolRegistry};
use gleaner_mcp::ReferenceServer;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gleaner-mock")]
#[command(about = "Reference MCP-style tool endpoint with canned SPL results", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8765")]
    port: u16,

    /// Name the SPL execution tool is advertised under
    #[arg(long, default_value = "run_splunk_query")]
    tool: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SplQueryTool::new(args.tool.clone())));
    tracing::info!("Registered tool {:?}", args.tool);

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Mock endpoint: http://{}/rpc", addr);

    let server = ReferenceServer::new(registry);
    server.serve(&addr).await?;

    Ok(())
}
