//! Error types for pipeline configuration.
//!
//! Only malformed configuration is an error at this level. A check that fails
//! on the data is reported through the verdict types, never raised.

use thiserror::Error;

/// Result type for configuration validation.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A fatal configuration error.
///
/// Surfaced immediately and never retried: continuing a run with malformed
/// rules is meaningless, so the first configuration error encountered aborts
/// the remaining checks.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The expected schema has no columns
    #[error("expected schema has no columns")]
    EmptySchema,

    /// A rule or stage references a column the dataset does not have
    #[error("column '{column}' required by {context} is missing from the {dataset} dataset")]
    MissingColumn {
        column: String,
        context: String,
        dataset: String,
    },

    /// Numeric bounds with min > max
    #[error("inverted bounds for {subject}: min {min} is greater than max {max}")]
    InvertedBounds {
        subject: String,
        min: f64,
        max: f64,
    },

    /// Row count bounds with min_rows >= max_rows
    #[error("inverted row count bounds: min_rows {min_rows} is not below max_rows {max_rows}")]
    InvertedRowCountBounds { min_rows: usize, max_rows: usize },

    /// A split fraction outside the open interval (0, 1)
    #[error("{name} must be a fraction in (0, 1), got {value}")]
    InvalidFraction { name: String, value: f64 },

    /// A divergence threshold that is not a positive finite number
    #[error("divergence threshold must be a positive finite number, got {0}")]
    InvalidThreshold(f64),

    /// A categorical rule with an empty allowed set
    #[error("allowed value set for column '{0}' is empty")]
    EmptyAllowedValues(String),

    /// A drift comparison where one side has no observations at all
    #[error("the {dataset} dataset has no non-null values in column '{column}'")]
    EmptyDistribution { dataset: String, column: String },
}

impl ConfigError {
    /// Creates a missing-column error.
    pub fn missing_column(
        column: impl Into<String>,
        context: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self::MissingColumn {
            column: column.into(),
            context: context.into(),
            dataset: dataset.into(),
        }
    }

    /// Creates an inverted-bounds error.
    pub fn inverted_bounds(subject: impl Into<String>, min: f64, max: f64) -> Self {
        Self::InvertedBounds {
            subject: subject.into(),
            min,
            max,
        }
    }

    /// Creates an invalid-fraction error.
    pub fn invalid_fraction(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidFraction {
            name: name.into(),
            value,
        }
    }
}
