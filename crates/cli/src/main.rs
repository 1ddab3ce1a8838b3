use anyhow::{Context, Result};
use clap::Parser;
use gleaner_core::spl::DEFAULT_DISCOVERY_SPL;
use gleaner_core::LabelMapping;
use gleaner_sdk::GleanerClient;
use std::path::PathBuf;

mod harvest;
mod output;
mod settings;

use harvest::HarvestPlan;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(about = "Harvest labeled incident exports from an MCP search endpoint", long_about = None)]
struct Args {
    /// HTTP URL for the MCP JSON-RPC endpoint
    #[arg(long)]
    mcp_url: Option<String>,

    /// Bearer token if the endpoint requires one
    #[arg(long)]
    token: Option<String>,

    /// MCP tool name for running SPL [default: run_splunk_query]
    #[arg(long)]
    tool: Option<String>,

    /// Path to a file overriding the built-in discovery SPL
    #[arg(long)]
    discovery_spl: Option<PathBuf>,

    /// Path to the label mapping JSON [default: schemas/label_mapping.json]
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// Incidents to export per label [default: 100]
    #[arg(short = 'n', long)]
    per_label: Option<usize>,

    /// Base SPL search for incident export [default: index=notable earliest=-90d]
    #[arg(long)]
    base_search: Option<String>,

    /// Output JSON path [default: out/harvest.json]
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Harvest only this label; repeat to select several, in order
    #[arg(long)]
    label: Vec<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "gleaner.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gleaner=info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let settings = Settings::resolve(args)?;

    tracing::info!("Harvesting from {}", settings.mcp_url);

    // Load the label mapping
    let mapping_text = std::fs::read_to_string(&settings.mapping)
        .with_context(|| format!("Failed to read label mapping {}", settings.mapping.display()))?;
    let mapping = LabelMapping::from_json(&mapping_text)
        .with_context(|| format!("Invalid label mapping {}", settings.mapping.display()))?;
    tracing::info!(
        "Loaded {} labels from {}",
        mapping.len(),
        settings.mapping.display()
    );

    let discovery_spl = match &settings.discovery_spl {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read discovery SPL {}", path.display()))?,
        None => DEFAULT_DISCOVERY_SPL.to_string(),
    };

    let mut builder = GleanerClient::builder().endpoint(&settings.mcp_url);
    if let Some(token) = &settings.token {
        builder = builder.token(token);
    }
    let client = builder.build()?;

    let plan = HarvestPlan {
        tool: settings.tool.clone(),
        discovery_spl,
        base_search: settings.base_search.clone(),
        per_label: settings.per_label,
        mapping,
        labels: settings.labels.clone(),
    };

    let records = harvest::run(&client, &plan).await?;
    output::write_records(&settings.out, &records)?;
    tracing::info!("Wrote {} records to {}", records.len(), settings.out.display());

    Ok(())
}
