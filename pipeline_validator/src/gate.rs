//! The validation gate.
//!
//! Orchestrates the schema, domain, and drift checks into a single verdict.
//! Every check runs even after an earlier failure so one invocation reports
//! every violation; only a configuration error short-circuits, since
//! continuing with malformed rules is meaningless.

use crate::{DomainValidator, DriftDetector, SchemaValidator};
use pipeline_core::{ConfigError, ValidationConfig, ValidationVerdict};
use pipeline_data::Dataset;
use tracing::info;

/// Pass/fail checkpoint a dataset must clear before being used downstream.
///
/// # Example
///
/// ```rust
/// use pipeline_core::ValidationConfigBuilder;
/// use pipeline_data::Dataset;
/// use pipeline_validator::ValidationGate;
///
/// let mut dataset = Dataset::new(vec!["neighbourhood_group".to_string()]).unwrap();
/// dataset.push_row(vec!["Queens".into()]).unwrap();
///
/// let config = ValidationConfigBuilder::new(["neighbourhood_group"])
///     .known_categories("neighbourhood_group", ["Queens"])
///     .drift("neighbourhood_group", 0.2)
///     .build();
///
/// let verdict = ValidationGate::new()
///     .validate(&dataset, &dataset, &config)
///     .unwrap();
/// assert!(verdict.passed());
/// ```
#[derive(Debug, Default)]
pub struct ValidationGate {
    schema_validator: SchemaValidator,
    domain_validator: DomainValidator,
    drift_detector: DriftDetector,
}

impl ValidationGate {
    /// Creates a new validation gate.
    pub fn new() -> Self {
        Self {
            schema_validator: SchemaValidator::new(),
            domain_validator: DomainValidator::new(),
            drift_detector: DriftDetector::new(),
        }
    }

    /// Runs every configured check against the candidate dataset and returns
    /// the verdict.
    ///
    /// Check order is deterministic: schema, then domain rules in declaration
    /// order, then drift. The candidate is never mutated or filtered. A
    /// failing check lands in the verdict; only malformed configuration
    /// (validated up front, plus missing columns discovered per check)
    /// returns an `Err`.
    pub fn validate(
        &self,
        candidate: &Dataset,
        reference: &Dataset,
        config: &ValidationConfig,
    ) -> Result<ValidationVerdict, ConfigError> {
        config.validate()?;

        let mut checks = Vec::new();
        checks.push(self.schema_validator.check(candidate, &config.expected_schema)?);
        checks.extend(
            self.domain_validator
                .check(candidate, &config.domain_rules())?,
        );
        checks.push(
            self.drift_detector
                .check(candidate, reference, &config.drift)?,
        );

        let verdict = ValidationVerdict::from_checks(checks);
        info!(
            passed = verdict.passed(),
            checks = verdict.checks().len(),
            failures = verdict.failures().count(),
            "validation gate complete"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_core::ValidationConfigBuilder;
    use pretty_assertions::assert_eq;

    fn listings_dataset(rows: &[(&str, f64, f64, f64)]) -> Dataset {
        let mut dataset = Dataset::new(vec![
            "neighbourhood_group".to_string(),
            "price".to_string(),
            "longitude".to_string(),
            "latitude".to_string(),
        ])
        .unwrap();
        for &(group, price, lon, lat) in rows {
            dataset
                .push_row(vec![group.into(), price.into(), lon.into(), lat.into()])
                .unwrap();
        }
        dataset
    }

    fn full_config() -> pipeline_core::ValidationConfig {
        ValidationConfigBuilder::new(["neighbourhood_group", "price", "longitude", "latitude"])
            .known_categories("neighbourhood_group", ["Bronx", "Brooklyn"])
            .price_range(10.0, 350.0)
            .geo_bounds(-74.25, -73.50, 40.5, 41.2)
            .row_count_bounds(1, 100)
            .drift("neighbourhood_group", 0.2)
            .build()
    }

    #[test]
    fn test_clean_dataset_passes_all_checks() {
        let dataset = listings_dataset(&[
            ("Bronx", 50.0, -73.9, 40.8),
            ("Brooklyn", 120.0, -73.95, 40.65),
            ("Bronx", 80.0, -73.88, 40.85),
        ]);

        let verdict = ValidationGate::new()
            .validate(&dataset, &dataset, &full_config())
            .unwrap();
        assert!(verdict.passed());
        assert_eq!(verdict.checks().len(), 6); // schema + 4 domain rules + drift
    }

    #[test]
    fn test_all_violations_reported_in_one_invocation() {
        // Price out of range AND an unexpected label; both must be reported
        let dataset = listings_dataset(&[
            ("Bronx", 5.0, -73.9, 40.8),
            ("Hoboken", 120.0, -73.95, 40.65),
            ("Brooklyn", 80.0, -73.88, 40.85),
        ]);
        let reference = listings_dataset(&[
            ("Bronx", 50.0, -73.9, 40.8),
            ("Brooklyn", 120.0, -73.95, 40.65),
        ]);

        let verdict = ValidationGate::new()
            .validate(&dataset, &reference, &full_config())
            .unwrap();
        assert!(!verdict.passed());

        let failed: Vec<&str> = verdict.failures().map(|c| c.name.as_str()).collect();
        assert!(failed.contains(&"categorical_membership(neighbourhood_group)"));
        assert!(failed.contains(&"numeric_range(price)"));
        // drift also fails: Hoboken is absent from the reference
        assert!(failed.contains(&"drift(neighbourhood_group)"));
    }

    #[test]
    fn test_check_order_is_deterministic() {
        let dataset = listings_dataset(&[("Bronx", 50.0, -73.9, 40.8), ("Brooklyn", 60.0, -73.9, 40.8)]);
        let verdict = ValidationGate::new()
            .validate(&dataset, &dataset, &full_config())
            .unwrap();

        let names: Vec<&str> = verdict.checks().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "schema",
                "categorical_membership(neighbourhood_group)",
                "numeric_range(price)",
                "bounding_box(longitude, latitude)",
                "row_count",
                "drift(neighbourhood_group)",
            ]
        );
    }

    #[test]
    fn test_config_error_short_circuits() {
        let dataset = listings_dataset(&[("Bronx", 50.0, -73.9, 40.8)]);
        let config = ValidationConfigBuilder::new(["neighbourhood_group", "price", "longitude", "latitude"])
            .known_categories("not_a_column", ["Bronx"])
            .drift("neighbourhood_group", 0.2)
            .build();

        let result = ValidationGate::new().validate(&dataset, &dataset, &config);
        assert!(matches!(result, Err(ConfigError::MissingColumn { .. })));
    }

    #[test]
    fn test_inverted_bounds_rejected_before_any_check() {
        let dataset = listings_dataset(&[("Bronx", 50.0, -73.9, 40.8)]);
        let config = ValidationConfigBuilder::new(["neighbourhood_group", "price", "longitude", "latitude"])
            .price_range(350.0, 10.0)
            .drift("neighbourhood_group", 0.2)
            .build();

        let result = ValidationGate::new().validate(&dataset, &dataset, &config);
        assert!(matches!(result, Err(ConfigError::InvertedBounds { .. })));
    }

    #[test]
    fn test_failing_schema_does_not_stop_other_checks() {
        // Schema fails (extra column order) but domain and drift still run
        let mut dataset = Dataset::new(vec![
            "price".to_string(),
            "neighbourhood_group".to_string(),
            "longitude".to_string(),
            "latitude".to_string(),
        ])
        .unwrap();
        dataset
            .push_row(vec![50.0.into(), "Bronx".into(), (-73.9).into(), 40.8.into()])
            .unwrap();

        let config = ValidationConfigBuilder::new([
            "neighbourhood_group",
            "price",
            "longitude",
            "latitude",
        ])
        .known_categories("neighbourhood_group", ["Bronx"])
        .drift("neighbourhood_group", 0.2)
        .build();

        let verdict = ValidationGate::new()
            .validate(&dataset, &dataset, &config)
            .unwrap();
        assert!(!verdict.passed());
        assert_eq!(verdict.checks().len(), 3); // schema + categorical + drift
        assert!(!verdict.checks()[0].passed); // schema failed
        assert!(verdict.checks()[1].passed); // categorical still evaluated
        assert!(verdict.checks()[2].passed); // drift still evaluated
    }
}
