use anyhow::{Context, Result};
use pipeline_config::parse_file;
use pipeline_data::{ArtifactRef, ArtifactStore, Dataset, LocalArtifactStore, read_csv};
use pipeline_validator::ValidationGate;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(
    store_root: &str,
    candidate: &str,
    reference: &str,
    config_path: &str,
    format: &str,
) -> Result<()> {
    info!("Validating candidate: {} against {}", candidate, reference);

    let config = parse_file(Path::new(config_path))
        .with_context(|| format!("Failed to parse configuration file: {config_path}"))?;

    let store = LocalArtifactStore::new(store_root);
    let candidate_data = fetch_dataset(&store, candidate)?;
    let reference_data = fetch_dataset(&store, reference)?;

    output::print_info(&format!(
        "Candidate: {} rows, reference: {} rows",
        candidate_data.len(),
        reference_data.len()
    ));

    let verdict =
        ValidationGate::new().validate(&candidate_data, &reference_data, &config.validation)?;

    output::print_verdict(&verdict, format);

    if !verdict.passed() {
        std::process::exit(1);
    }

    Ok(())
}

fn fetch_dataset(store: &LocalArtifactStore, reference: &str) -> Result<Dataset> {
    let parsed = ArtifactRef::parse(reference)
        .with_context(|| format!("Invalid artifact reference: {reference}"))?;
    let path = store
        .fetch(&parsed)
        .with_context(|| format!("Failed to fetch artifact: {reference}"))?;
    read_csv(&path).with_context(|| format!("Failed to read artifact data: {}", path.display()))
}
