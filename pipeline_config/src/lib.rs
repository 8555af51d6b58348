//! Parser for listings pipeline configuration files (YAML/TOML formats).
//!
//! This module reads a pipeline configuration from YAML or TOML into the
//! strongly-typed [`PipelineConfig`] structure and validates it, so a
//! malformed configuration is rejected before any data is read.
//!
//! # Example
//!
//! ```rust
//! use pipeline_config::parse_yaml;
//!
//! let yaml = r#"
//! cleaning:
//!   min_price: 10
//!   max_price: 350
//!   geo_bounds:
//!     lon_min: -74.25
//!     lon_max: -73.50
//!     lat_min: 40.5
//!     lat_max: 41.2
//! validation:
//!   expected_schema: [id, name, price]
//!   drift:
//!     group_column: neighbourhood_group
//!     divergence_threshold: 0.2
//! split:
//!   test_size: 0.2
//!   val_size: 0.2
//!   random_seed: 42
//!   stratify_by: neighbourhood_group
//! "#;
//!
//! let config = parse_yaml(yaml).expect("Failed to parse configuration");
//! assert_eq!(config.split.random_seed, 42);
//! ```

use pipeline_core::{ConfigError, PipelineConfig};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a pipeline configuration.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The parsed configuration is malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a pipeline configuration from a YAML string.
///
/// The configuration is validated after deserialization; inverted bounds,
/// empty schemas, and out-of-range fractions are rejected here.
pub fn parse_yaml(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = serde_yaml_ng::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Parse a pipeline configuration from a TOML string.
///
/// The configuration is validated after deserialization, like [`parse_yaml`].
pub fn parse_toml(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Detect the configuration format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ConfigFormat::Yaml`
/// * `.toml` → `ConfigFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        "toml" => Ok(ConfigFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a pipeline configuration from a file with automatic format detection.
///
/// The format is determined by the file extension:
/// - `.yaml`, `.yml` → parsed as YAML
/// - `.toml` → parsed as TOML
///
/// # Example
///
/// ```no_run
/// use pipeline_config::parse_file;
/// use std::path::Path;
///
/// let config = parse_file(Path::new("pipeline.yml")).unwrap();
/// println!("Stratifying by: {}", config.split.stratify_by);
/// ```
pub fn parse_file(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    let format = detect_format(path)?;

    match format {
        ConfigFormat::Yaml => parse_yaml(&content),
        ConfigFormat::Toml => parse_toml(&content),
    }
}
