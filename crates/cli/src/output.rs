use anyhow::{Context, Result};
use gleaner_core::HarvestRecord;
use std::path::Path;

/// Write harvest records as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn write_records(path: &Path, records: &[HarvestRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }

    let body =
        serde_json::to_string_pretty(records).context("Failed to serialize harvest records")?;
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write output file {}", path.display()))?;

    Ok(())
}
