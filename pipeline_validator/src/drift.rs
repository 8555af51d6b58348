//! Distributional drift detection.
//!
//! Builds frequency distributions over one categorical column from the
//! candidate and reference datasets, aligns them over the lexicographically
//! sorted union of categories (zero fill for categories absent on one side),
//! and computes the Kullback-Leibler divergence with a base-2 logarithm.
//!
//! Counts are collected per invocation and normalized to probabilities
//! inside the divergence computation; nothing is cached across runs. A
//! category present in the candidate but absent from the reference makes the
//! divergence infinite — that is reported as an explicit failing check, never
//! propagated as NaN.

use pipeline_core::{CheckResult, ConfigError, DriftConfig};
use pipeline_data::Dataset;
use std::collections::BTreeSet;
use tracing::debug;

/// Detects drift between a candidate and a reference distribution.
#[derive(Debug, Default)]
pub struct DriftDetector;

impl DriftDetector {
    /// Creates a new drift detector.
    pub fn new() -> Self {
        Self
    }

    /// Compares the candidate's distribution over the group column to the
    /// reference's and applies the threshold.
    ///
    /// Passes iff divergence is strictly below the threshold; a divergence
    /// equal to the threshold fails. Comparing a dataset against itself
    /// yields exactly zero.
    pub fn check(
        &self,
        candidate: &Dataset,
        reference: &Dataset,
        config: &DriftConfig,
    ) -> Result<CheckResult, ConfigError> {
        config.validate()?;
        let column = &config.group_column;
        let name = format!("drift({column})");

        let candidate_counts = candidate
            .value_counts(column)
            .ok_or_else(|| ConfigError::missing_column(column, "drift check", "candidate"))?;
        let reference_counts = reference
            .value_counts(column)
            .ok_or_else(|| ConfigError::missing_column(column, "drift check", "reference"))?;

        if candidate_counts.is_empty() {
            return Err(ConfigError::EmptyDistribution {
                dataset: "candidate".to_string(),
                column: column.clone(),
            });
        }
        if reference_counts.is_empty() {
            return Err(ConfigError::EmptyDistribution {
                dataset: "reference".to_string(),
                column: column.clone(),
            });
        }

        // Align both distributions over the sorted union of categories so
        // the computation is reproducible regardless of input record order.
        let categories: BTreeSet<&str> = candidate_counts
            .keys()
            .chain(reference_counts.keys())
            .map(String::as_str)
            .collect();

        let candidate_aligned: Vec<u64> = categories
            .iter()
            .map(|c| candidate_counts.get(*c).copied().unwrap_or(0))
            .collect();
        let reference_aligned: Vec<u64> = categories
            .iter()
            .map(|c| reference_counts.get(*c).copied().unwrap_or(0))
            .collect();

        let divergence = kl_divergence_base2(&candidate_aligned, &reference_aligned);
        debug!(column = %column, divergence, threshold = config.divergence_threshold, "drift computed");

        if divergence.is_infinite() {
            let novel: Vec<&str> = categories
                .iter()
                .zip(&reference_aligned)
                .filter(|&(_, &count)| count == 0)
                .map(|(category, _)| *category)
                .collect();
            return Ok(CheckResult::fail(
                name,
                format!(
                    "divergence is infinite: categories [{}] present in candidate but absent from reference",
                    novel.join(", ")
                ),
            ));
        }

        if divergence < config.divergence_threshold {
            Ok(CheckResult::pass(
                name,
                format!(
                    "KL divergence {:.6} below threshold {}",
                    divergence, config.divergence_threshold
                ),
            ))
        } else {
            Ok(CheckResult::fail(
                name,
                format!(
                    "KL divergence {:.6} not below threshold {}",
                    divergence, config.divergence_threshold
                ),
            ))
        }
    }
}

/// KL divergence with base-2 logarithm over two aligned count vectors.
///
/// Counts are normalized to probabilities before summing, so unequal dataset
/// sizes compare correctly. Zero-probability candidate terms contribute
/// nothing; a zero-probability reference term with nonzero candidate mass
/// makes the result infinite.
fn kl_divergence_base2(candidate: &[u64], reference: &[u64]) -> f64 {
    let candidate_total: f64 = candidate.iter().sum::<u64>() as f64;
    let reference_total: f64 = reference.iter().sum::<u64>() as f64;

    let mut divergence = 0.0;
    for (&c, &r) in candidate.iter().zip(reference) {
        if c == 0 {
            continue;
        }
        if r == 0 {
            return f64::INFINITY;
        }
        let p = c as f64 / candidate_total;
        let q = r as f64 / reference_total;
        divergence += p * (p / q).log2();
    }
    divergence
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labeled_dataset(labels: &[(&str, usize)]) -> Dataset {
        let mut dataset = Dataset::new(vec!["neighbourhood_group".to_string()]).unwrap();
        for &(label, count) in labels {
            for _ in 0..count {
                dataset.push_row(vec![label.into()]).unwrap();
            }
        }
        dataset
    }

    fn config(threshold: f64) -> DriftConfig {
        DriftConfig {
            group_column: "neighbourhood_group".to_string(),
            divergence_threshold: threshold,
        }
    }

    #[test]
    fn test_self_comparison_is_zero() {
        let dataset = labeled_dataset(&[("Bronx", 30), ("Brooklyn", 50), ("Manhattan", 20)]);
        let result = DriftDetector::new()
            .check(&dataset, &dataset, &config(0.001))
            .unwrap();
        assert!(result.passed, "{}", result.message);
        assert!(result.message.contains("0.000000"));
    }

    #[test]
    fn test_identical_proportions_different_sizes() {
        // Normalization makes a 2x larger reference with the same mix
        // indistinguishable from the candidate.
        let candidate = labeled_dataset(&[("Bronx", 10), ("Brooklyn", 30)]);
        let reference = labeled_dataset(&[("Bronx", 20), ("Brooklyn", 60)]);
        let result = DriftDetector::new()
            .check(&candidate, &reference, &config(0.001))
            .unwrap();
        assert!(result.passed, "{}", result.message);
    }

    #[test]
    fn test_shifted_distribution_fails_tight_threshold() {
        let candidate = labeled_dataset(&[("Bronx", 90), ("Brooklyn", 10)]);
        let reference = labeled_dataset(&[("Bronx", 10), ("Brooklyn", 90)]);
        let result = DriftDetector::new()
            .check(&candidate, &reference, &config(0.5))
            .unwrap();
        assert!(!result.passed, "{}", result.message);
    }

    #[test]
    fn test_novel_candidate_category_is_infinite() {
        let candidate = labeled_dataset(&[("Bronx", 50), ("Hoboken", 50)]);
        let reference = labeled_dataset(&[("Bronx", 100)]);
        let result = DriftDetector::new()
            .check(&candidate, &reference, &config(10.0))
            .unwrap();
        assert!(!result.passed);
        assert!(result.message.contains("Hoboken"), "{}", result.message);
        assert!(result.message.contains("infinite"));
    }

    #[test]
    fn test_category_missing_from_candidate_is_finite() {
        // Zero candidate mass contributes nothing to the sum
        let candidate = labeled_dataset(&[("Bronx", 100)]);
        let reference = labeled_dataset(&[("Bronx", 90), ("Brooklyn", 10)]);
        let result = DriftDetector::new()
            .check(&candidate, &reference, &config(1.0))
            .unwrap();
        assert!(result.passed, "{}", result.message);
    }

    #[test]
    fn test_divergence_equal_to_threshold_fails() {
        // Self comparison gives exactly 0.0; a threshold of 0.0 is invalid,
        // so exercise strictness through the raw computation instead.
        let divergence = kl_divergence_base2(&[1, 1], &[1, 1]);
        assert_eq!(divergence, 0.0);
        assert!(!(divergence < 0.0), "strict less-than must fail at equality");

        let candidate = labeled_dataset(&[("Bronx", 90), ("Brooklyn", 10)]);
        let reference = labeled_dataset(&[("Bronx", 10), ("Brooklyn", 90)]);
        let exact = kl_divergence_base2(&[90, 10], &[10, 90]);
        let result = DriftDetector::new()
            .check(&candidate, &reference, &config(exact))
            .unwrap();
        assert!(!result.passed, "divergence equal to threshold must fail");
    }

    #[test]
    fn test_missing_group_column_is_config_error() {
        let dataset = labeled_dataset(&[("Bronx", 10)]);
        let other = Dataset::new(vec!["something_else".to_string()]).unwrap();
        let result = DriftDetector::new().check(&dataset, &other, &config(0.2));
        assert!(matches!(result, Err(ConfigError::MissingColumn { .. })));
    }

    #[test]
    fn test_empty_reference_distribution_is_config_error() {
        let candidate = labeled_dataset(&[("Bronx", 10)]);
        let reference = labeled_dataset(&[]);
        let result = DriftDetector::new().check(&candidate, &reference, &config(0.2));
        assert!(matches!(result, Err(ConfigError::EmptyDistribution { .. })));
    }

    #[test]
    fn test_known_divergence_value() {
        // p = (0.75, 0.25), q = (0.5, 0.5):
        // 0.75*log2(1.5) + 0.25*log2(0.5) = 0.75*0.584962... - 0.25
        let divergence = kl_divergence_base2(&[75, 25], &[50, 50]);
        let expected = 0.75 * 1.5f64.log2() + 0.25 * 0.5f64.log2();
        assert!((divergence - expected).abs() < 1e-12);
    }
}
