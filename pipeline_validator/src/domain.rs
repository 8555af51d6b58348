//! Domain validation logic.
//!
//! Evaluates the configured domain rules against a candidate dataset:
//!
//! - CategoricalMembership: observed label set must exactly equal the allowed
//!   set (unexpected labels and absent labels both fail)
//! - NumericRange: every value inside a closed interval
//! - BoundingBox: both coordinates inside the box, per record
//! - RowCount: record count strictly between exclusive bounds
//!
//! Rules are evaluated independently, one result per rule, with no
//! short-circuit between them. A rule referencing a column the dataset does
//! not have is a configuration error and aborts immediately.

use pipeline_core::{CheckResult, ConfigError, DomainRule, GeoBounds, NumericBounds, RowCountBounds};
use pipeline_data::{DataValue, Dataset};
use std::collections::BTreeSet;
use tracing::debug;

/// How many offending values a failure message spells out before truncating.
const MAX_EXAMPLES: usize = 5;

/// Validates domain rules against a dataset.
#[derive(Debug, Default)]
pub struct DomainValidator;

impl DomainValidator {
    /// Creates a new domain validator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates every rule, in declaration order.
    ///
    /// Returns one result per rule. The first rule referencing a missing
    /// column surfaces as a `ConfigError` and the remaining rules are not
    /// attempted; continuing with malformed rules is meaningless.
    pub fn check(
        &self,
        dataset: &Dataset,
        rules: &[DomainRule],
    ) -> Result<Vec<CheckResult>, ConfigError> {
        let mut results = Vec::with_capacity(rules.len());
        for rule in rules {
            let result = self.evaluate(dataset, rule)?;
            debug!(check = %result.name, passed = result.passed, "domain rule evaluated");
            results.push(result);
        }
        Ok(results)
    }

    fn evaluate(&self, dataset: &Dataset, rule: &DomainRule) -> Result<CheckResult, ConfigError> {
        match rule {
            DomainRule::CategoricalMembership { column, allowed } => {
                self.check_categorical(dataset, rule, column, allowed)
            }
            DomainRule::NumericRange { column, bounds } => {
                self.check_numeric_range(dataset, rule, column, bounds)
            }
            DomainRule::BoundingBox {
                longitude_column,
                latitude_column,
                bounds,
            } => self.check_bounding_box(dataset, rule, longitude_column, latitude_column, bounds),
            DomainRule::RowCount { bounds } => Ok(self.check_row_count(dataset, rule, bounds)),
        }
    }

    /// Strict set equality between observed and allowed labels. Nulls do not
    /// form a category.
    fn check_categorical(
        &self,
        dataset: &Dataset,
        rule: &DomainRule,
        column: &str,
        allowed: &[String],
    ) -> Result<CheckResult, ConfigError> {
        let counts = dataset
            .value_counts(column)
            .ok_or_else(|| ConfigError::missing_column(column, rule.name(), "candidate"))?;

        let observed: BTreeSet<&str> = counts.keys().map(String::as_str).collect();
        let allowed_set: BTreeSet<&str> = allowed.iter().map(String::as_str).collect();

        let unexpected: Vec<&str> = observed.difference(&allowed_set).copied().collect();
        let absent: Vec<&str> = allowed_set.difference(&observed).copied().collect();

        if unexpected.is_empty() && absent.is_empty() {
            return Ok(CheckResult::pass(
                rule.name(),
                format!(
                    "observed labels exactly match the {} allowed labels",
                    allowed_set.len()
                ),
            ));
        }

        let mut parts = Vec::new();
        if !unexpected.is_empty() {
            parts.push(format!("unexpected labels: [{}]", unexpected.join(", ")));
        }
        if !absent.is_empty() {
            parts.push(format!("expected labels absent: [{}]", absent.join(", ")));
        }
        Ok(CheckResult::fail(rule.name(), parts.join("; ")))
    }

    /// Closed interval check; boundary values pass. Nulls and non-numeric
    /// values cannot satisfy a numeric range and count as violations.
    fn check_numeric_range(
        &self,
        dataset: &Dataset,
        rule: &DomainRule,
        column: &str,
        bounds: &NumericBounds,
    ) -> Result<CheckResult, ConfigError> {
        let values = dataset
            .column_values(column)
            .ok_or_else(|| ConfigError::missing_column(column, rule.name(), "candidate"))?;

        let mut violations = 0usize;
        let mut examples = Vec::new();
        for (row, value) in values.enumerate() {
            let in_range = value.as_float().map(|v| bounds.contains(v)).unwrap_or(false);
            if !in_range {
                violations += 1;
                if examples.len() < MAX_EXAMPLES {
                    examples.push(format!("row {row}: {value:?}"));
                }
            }
        }

        if violations == 0 {
            return Ok(CheckResult::pass(
                rule.name(),
                format!(
                    "all {} values within [{}, {}]",
                    dataset.len(),
                    bounds.min,
                    bounds.max
                ),
            ));
        }
        Ok(CheckResult::fail(
            rule.name(),
            format!(
                "{} value(s) outside [{}, {}], e.g. {}",
                violations,
                bounds.min,
                bounds.max,
                examples.join("; ")
            ),
        ))
    }

    /// Both coordinates must satisfy their range simultaneously, evaluated
    /// per record.
    fn check_bounding_box(
        &self,
        dataset: &Dataset,
        rule: &DomainRule,
        longitude_column: &str,
        latitude_column: &str,
        bounds: &GeoBounds,
    ) -> Result<CheckResult, ConfigError> {
        let lon_idx = dataset.column_index(longitude_column).ok_or_else(|| {
            ConfigError::missing_column(longitude_column, rule.name(), "candidate")
        })?;
        let lat_idx = dataset
            .column_index(latitude_column)
            .ok_or_else(|| ConfigError::missing_column(latitude_column, rule.name(), "candidate"))?;

        let mut violations = 0usize;
        for row in dataset.rows() {
            let inside = match (row[lon_idx].as_float(), row[lat_idx].as_float()) {
                (Some(lon), Some(lat)) => bounds.contains(lon, lat),
                _ => false,
            };
            if !inside {
                violations += 1;
            }
        }

        if violations == 0 {
            return Ok(CheckResult::pass(
                rule.name(),
                format!("all {} records inside the bounding box", dataset.len()),
            ));
        }
        Ok(CheckResult::fail(
            rule.name(),
            format!(
                "{} record(s) outside lon [{}, {}] x lat [{}, {}]",
                violations, bounds.lon_min, bounds.lon_max, bounds.lat_min, bounds.lat_max
            ),
        ))
    }

    /// Exclusive bounds: a count equal to either bound fails.
    fn check_row_count(
        &self,
        dataset: &Dataset,
        rule: &DomainRule,
        bounds: &RowCountBounds,
    ) -> CheckResult {
        let count = dataset.len();
        if bounds.contains(count) {
            CheckResult::pass(
                rule.name(),
                format!(
                    "{} rows, strictly between {} and {}",
                    count, bounds.min_rows, bounds.max_rows
                ),
            )
        } else {
            CheckResult::fail(
                rule.name(),
                format!(
                    "{} rows, not strictly between {} and {}",
                    count, bounds.min_rows, bounds.max_rows
                ),
            )
        }
    }
}
