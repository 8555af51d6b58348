use anyhow::{Context, Result};
use pipeline_data::{ArtifactStore, LocalArtifactStore, read_csv};
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(store_root: &str, file: &str, name: &str, kind: &str, description: &str) -> Result<()> {
    info!("Importing file: {}", file);

    let path = Path::new(file);
    // Parse up front so a malformed file is rejected before anything is
    // published
    let dataset =
        read_csv(path).with_context(|| format!("Failed to read CSV file: {file}"))?;

    output::print_info(&format!(
        "Parsed {} rows, {} columns",
        dataset.len(),
        dataset.columns().len()
    ));

    let store = LocalArtifactStore::new(store_root);
    let reference = store
        .publish(name, kind, description, path)
        .with_context(|| format!("Failed to publish artifact: {name}"))?;

    output::print_success(&format!("Published {reference}"));
    Ok(())
}
