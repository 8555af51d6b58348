//! Schema validation logic.
//!
//! Compares a dataset's column sequence, order included, against the
//! expected schema. Set equality is not enough: the same columns in a
//! different order fail.

use pipeline_core::{CheckResult, ConfigError, Schema};
use pipeline_data::Dataset;
use std::collections::HashSet;

/// Check name reported in verdicts.
pub const SCHEMA_CHECK: &str = "schema";

/// Validates a dataset's column sequence against an expected schema.
#[derive(Debug, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    pub fn new() -> Self {
        Self
    }

    /// Checks the dataset's columns against the expected sequence.
    ///
    /// Passes only on exact ordered equality. An empty expected schema is a
    /// configuration error, not a data failure.
    pub fn check(&self, dataset: &Dataset, expected: &Schema) -> Result<CheckResult, ConfigError> {
        if expected.is_empty() {
            return Err(ConfigError::EmptySchema);
        }

        let actual = dataset.columns();
        if actual == expected.columns.as_slice() {
            return Ok(CheckResult::pass(
                SCHEMA_CHECK,
                format!("all {} columns present in expected order", expected.len()),
            ));
        }

        let expected_set: HashSet<&str> = expected.columns.iter().map(String::as_str).collect();
        let actual_set: HashSet<&str> = actual.iter().map(String::as_str).collect();

        let missing: Vec<&str> = expected
            .columns
            .iter()
            .map(String::as_str)
            .filter(|column| !actual_set.contains(column))
            .collect();
        let unexpected: Vec<&str> = actual
            .iter()
            .map(String::as_str)
            .filter(|column| !expected_set.contains(column))
            .collect();

        let message = if missing.is_empty() && unexpected.is_empty() {
            format!(
                "columns out of order: expected [{}], found [{}]",
                expected.columns.join(", "),
                actual.join(", ")
            )
        } else {
            let mut parts = Vec::new();
            if !missing.is_empty() {
                parts.push(format!("missing columns: [{}]", missing.join(", ")));
            }
            if !unexpected.is_empty() {
                parts.push(format!("unexpected columns: [{}]", unexpected.join(", ")));
            }
            parts.join("; ")
        };

        Ok(CheckResult::fail(SCHEMA_CHECK, message))
    }
}
