use anyhow::{Context, Result};
use gleaner_core::spl::build_export_spl;
use gleaner_core::{HarvestRecord, Label, LabelMapping};
use gleaner_sdk::GleanerClient;
use serde_json::json;

/// Everything one harvest run needs besides the client itself.
#[derive(Debug, Clone)]
pub struct HarvestPlan {
    pub tool: String,
    pub discovery_spl: String,
    pub base_search: String,
    pub per_label: usize,
    pub mapping: LabelMapping,
    /// Labels to process, in order. Empty means every mapping label.
    pub labels: Vec<Label>,
}

impl HarvestPlan {
    fn selected_labels(&self) -> Vec<Label> {
        if self.labels.is_empty() {
            self.mapping.labels().cloned().collect()
        } else {
            self.labels.clone()
        }
    }
}

/// Run the full harvest sequence: tool discovery, the discovery probe, then
/// one export query per label. The first failed call aborts the run.
pub async fn run(client: &GleanerClient, plan: &HarvestPlan) -> Result<Vec<HarvestRecord>> {
    let catalog = client
        .list_tools()
        .await
        .context("Failed to list tools on the MCP endpoint")?;
    let names: Vec<&str> = catalog.tools.iter().map(|t| t.name.as_str()).collect();
    tracing::info!("MCP tools available: {:?}", names);
    if !names.contains(&plan.tool.as_str()) {
        tracing::warn!("Tool {:?} is not advertised by the endpoint", plan.tool);
    }

    tracing::info!("Running discovery probe");
    let discovery = client
        .call_tool(&plan.tool, json!({ "query": plan.discovery_spl }))
        .await
        .context("Discovery probe failed")?;
    if let Some(object) = discovery.as_object() {
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        tracing::info!("Discovery result keys: {:?}", keys);
    }

    let mut records = Vec::new();
    for label in plan.selected_labels() {
        let rules = plan.mapping.rules_for(&label);
        if rules.is_empty() {
            tracing::warn!("No rules mapped for label {}, exporting unfiltered", label);
        }

        tracing::info!(
            "Exporting up to {} incidents for label={}",
            plan.per_label,
            label
        );
        let spl = build_export_spl(&plan.base_search, &label, rules, plan.per_label);
        let result = client
            .call_tool(&plan.tool, json!({ "query": spl }))
            .await
            .with_context(|| format!("Export query for label {} failed", label))?;

        records.push(HarvestRecord { label, spl, result });
    }

    Ok(records)
}
