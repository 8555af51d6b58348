use anyhow::{Context, Result};
use pipeline_config::parse_file;
use pipeline_data::{ArtifactRef, ArtifactStore, LocalArtifactStore, read_csv};
use pipeline_split::Splitter;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(store_root: &str, input: &str, config_path: &str, prefix: &str) -> Result<()> {
    info!("Splitting artifact: {}", input);

    let config = parse_file(Path::new(config_path))
        .with_context(|| format!("Failed to parse configuration file: {config_path}"))?;

    let store = LocalArtifactStore::new(store_root);
    let reference =
        ArtifactRef::parse(input).with_context(|| format!("Invalid artifact reference: {input}"))?;
    let data_path = store
        .fetch(&reference)
        .with_context(|| format!("Failed to fetch artifact: {input}"))?;
    let dataset = read_csv(&data_path)
        .with_context(|| format!("Failed to read artifact data: {}", data_path.display()))?;

    output::print_info(&format!("Fetched {reference} ({} rows)", dataset.len()));

    let result = Splitter::new().split(&dataset, &config.split)?;
    let inputs = vec![reference.to_string()];

    for (suffix, partition) in [
        ("train", &result.train),
        ("val", &result.validation),
        ("test", &result.test),
    ] {
        let published = store.publish_dataset(
            &format!("{prefix}_{suffix}"),
            "dataset_split",
            &format!("{suffix} partition, stratified by {}", config.split.stratify_by),
            &inputs,
            partition,
        )?;
        output::print_success(&format!("Published {published} ({} rows)", partition.len()));
    }

    Ok(())
}
