use anyhow::{Context, Result};
use gleaner_core::Label;
use serde::Deserialize;
use std::path::PathBuf;

use crate::Args;

const DEFAULT_TOOL: &str = "run_splunk_query";
const DEFAULT_MAPPING: &str = "schemas/label_mapping.json";
const DEFAULT_BASE_SEARCH: &str = "index=notable earliest=-90d";
const DEFAULT_PER_LABEL: usize = 100;
const DEFAULT_OUT: &str = "out/harvest.json";

/// Fully resolved run configuration.
///
/// Flags take precedence over the optional TOML file, which takes precedence
/// over built-in defaults. Only the endpoint URL has no default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mcp_url: String,
    pub token: Option<String>,
    pub tool: String,
    pub discovery_spl: Option<PathBuf>,
    pub mapping: PathBuf,
    pub base_search: String,
    pub per_label: usize,
    pub out: PathBuf,
    pub labels: Vec<Label>,
}

/// Shape of the TOML settings file; every key may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    pub mcp_url: Option<String>,
    pub token: Option<String>,
    pub tool: Option<String>,
    pub discovery_spl: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub base_search: Option<String>,
    pub per_label: Option<usize>,
    pub out: Option<PathBuf>,
    pub labels: Option<Vec<String>>,
}

impl Settings {
    pub fn resolve(args: Args) -> Result<Self> {
        let file = SettingsFile::load(&args.config)?;

        let mcp_url = args.mcp_url.or(file.mcp_url).context(
            "an MCP endpoint URL is required (--mcp-url or mcp_url in the config file)",
        )?;

        let labels = if args.label.is_empty() {
            file.labels.unwrap_or_default()
        } else {
            args.label
        };

        Ok(Self {
            mcp_url,
            token: args.token.or(file.token),
            tool: args
                .tool
                .or(file.tool)
                .unwrap_or_else(|| DEFAULT_TOOL.to_string()),
            discovery_spl: args.discovery_spl.or(file.discovery_spl),
            mapping: args
                .mapping
                .or(file.mapping)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING)),
            base_search: args
                .base_search
                .or(file.base_search)
                .unwrap_or_else(|| DEFAULT_BASE_SEARCH.to_string()),
            per_label: args.per_label.or(file.per_label).unwrap_or(DEFAULT_PER_LABEL),
            out: args
                .out
                .or(file.out)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT)),
            labels: labels.into_iter().map(Label::new).collect(),
        })
    }
}

impl SettingsFile {
    fn load(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }
}
