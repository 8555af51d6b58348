//! # Pipeline Split
//!
//! The splitting stage of the listings pipeline: partitions a dataset into
//! train/validation/test subsets with stratified sampling and an explicit
//! integer seed.
//!
//! The split is two-stage: `test_size` of the full dataset becomes the test
//! partition, then `val_size` of the remainder becomes validation, and the
//! rest is train. Within each stage, rows are grouped by the stratification
//! label, groups are visited in lexicographic order, each group is shuffled
//! by a generator seeded from `random_seed` (a fresh generator per stage,
//! same seed), and a rounded fraction of each group is taken. Identical
//! seed, fractions, and input reproduce identical row membership.

use pipeline_core::{ConfigError, SplitConfig};
use pipeline_data::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during splitting.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Malformed split configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The stratification column has a null value; a row without a label
    /// cannot be assigned to a stratum
    #[error("null value in stratification column '{column}' at row {row}")]
    NullStratifyValue { column: String, row: usize },
}

/// The three disjoint partitions produced by a split.
#[derive(Debug)]
pub struct SplitResult {
    /// Training partition
    pub train: Dataset,
    /// Validation partition
    pub validation: Dataset,
    /// Test partition
    pub test: Dataset,
}

/// The splitting stage.
#[derive(Debug, Default)]
pub struct Splitter;

impl Splitter {
    /// Creates a new splitter.
    pub fn new() -> Self {
        Self
    }

    /// Partitions the dataset into train/validation/test.
    ///
    /// Every input row lands in exactly one partition; the partitions are
    /// pairwise disjoint; each partition's per-label proportions approximate
    /// the parent's within rounding.
    pub fn split(&self, dataset: &Dataset, config: &SplitConfig) -> Result<SplitResult, SplitError> {
        config.validate()?;
        if !dataset.has_column(&config.stratify_by) {
            return Err(ConfigError::missing_column(
                &config.stratify_by,
                "stratified split",
                "input",
            )
            .into());
        }

        let labels = self.stratify_labels(dataset, config)?;
        let all_indices: Vec<usize> = (0..dataset.len()).collect();

        // Stage one: take test_size of the full dataset
        let (test_indices, trainval_indices) = take_stratified(
            &all_indices,
            &labels,
            config.test_size,
            config.random_seed,
        );

        // Stage two: take val_size of the remainder, fresh generator, same
        // seed
        let (val_indices, train_indices) = take_stratified(
            &trainval_indices,
            &labels,
            config.val_size,
            config.random_seed,
        );

        info!(
            input = dataset.len(),
            train = train_indices.len(),
            validation = val_indices.len(),
            test = test_indices.len(),
            seed = config.random_seed,
            "stratified split complete"
        );

        Ok(SplitResult {
            train: dataset.select_rows(&train_indices),
            validation: dataset.select_rows(&val_indices),
            test: dataset.select_rows(&test_indices),
        })
    }

    /// One stratification label per row, in row order.
    fn stratify_labels(
        &self,
        dataset: &Dataset,
        config: &SplitConfig,
    ) -> Result<Vec<String>, SplitError> {
        let values = dataset
            .column_values(&config.stratify_by)
            .expect("column checked above");
        values
            .enumerate()
            .map(|(row, value)| {
                if value.is_null() {
                    Err(SplitError::NullStratifyValue {
                        column: config.stratify_by.clone(),
                        row,
                    })
                } else {
                    Ok(value.to_string())
                }
            })
            .collect()
    }
}

/// Takes approximately `fraction` of `indices` per stratification label.
///
/// Returns `(taken, remainder)`, both sorted ascending so output row order
/// follows input row order. Groups are visited in lexicographic label order
/// and shuffled with a generator seeded from `seed`, which makes the
/// membership a pure function of (indices, labels, fraction, seed).
fn take_stratified(
    indices: &[usize],
    labels: &[String],
    fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &index in indices {
        groups.entry(labels[index].as_str()).or_default().push(index);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut taken = Vec::new();
    let mut remainder = Vec::new();

    for (_, mut group) in groups {
        group.shuffle(&mut rng);
        let count = ((group.len() as f64) * fraction).round() as usize;
        let count = count.min(group.len());
        taken.extend_from_slice(&group[..count]);
        remainder.extend_from_slice(&group[count..]);
    }

    taken.sort_unstable();
    remainder.sort_unstable();
    (taken, remainder)
}
