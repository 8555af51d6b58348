use anyhow::{Context, Result};
use pipeline_clean::Cleaner;
use pipeline_config::parse_file;
use pipeline_data::{ArtifactRef, ArtifactStore, LocalArtifactStore, read_csv};
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(store_root: &str, input: &str, config_path: &str, output_name: &str) -> Result<()> {
    info!("Cleaning artifact: {}", input);

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

    let (cleaned, report) = Cleaner::new().clean(&dataset, &config.cleaning)?;

    output::print_info(&format!(
        "Removed {} price outliers, {} rows outside the bounding box; {} unparseable dates nulled",
        report.price_outliers, report.geo_outliers, report.unparsed_dates
    ));

    let published = store.publish_dataset(
        output_name,
        "clean_data",
        "Cleaned listings dataset",
        &[reference.to_string()],
        &cleaned,
    )?;

    output::print_success(&format!(
        "Published {published} ({} rows from {} input rows)",
        report.output_rows, report.input_rows
    ));
    Ok(())
}
