//! Pipeline configuration types.
//!
//! Every recognized option for every stage is enumerated here with its type.
//! Each section knows how to validate itself; `PipelineConfig::validate`
//! runs all of them so malformed configuration is rejected before any data
//! is touched.

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_price_column() -> String {
    "price".to_string()
}

fn default_longitude_column() -> String {
    "longitude".to_string()
}

fn default_latitude_column() -> String {
    "latitude".to_string()
}

fn default_date_column() -> String {
    "last_review".to_string()
}

/// An ordered sequence of column names.
///
/// Fixed and known at validation time, never inferred from data. Column order
/// is significant: two schemas with the same columns in a different order are
/// different schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// Column names, in on-disk order
    pub columns: Vec<String>,
}

impl Schema {
    /// Creates a schema from an ordered list of column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A closed numeric interval. Boundary values are inside the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    /// Minimum value (inclusive)
    pub min: f64,
    /// Maximum value (inclusive)
    pub max: f64,
}

impl NumericBounds {
    /// Creates a new closed interval.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Rejects inverted bounds.
    pub fn validate(&self, subject: &str) -> Result<()> {
        if self.min > self.max {
            return Err(ConfigError::inverted_bounds(subject, self.min, self.max));
        }
        Ok(())
    }
}

/// A geographic bounding box over a (longitude, latitude) column pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Western edge (inclusive)
    pub lon_min: f64,
    /// Eastern edge (inclusive)
    pub lon_max: f64,
    /// Southern edge (inclusive)
    pub lat_min: f64,
    /// Northern edge (inclusive)
    pub lat_max: f64,
}

impl GeoBounds {
    /// Returns true if the point lies inside the box. Both coordinates must
    /// satisfy their range for the point to be inside.
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.lon_min
            && longitude <= self.lon_max
            && latitude >= self.lat_min
            && latitude <= self.lat_max
    }

    /// Rejects a box whose edges are inverted.
    pub fn validate(&self) -> Result<()> {
        if self.lon_min > self.lon_max {
            return Err(ConfigError::inverted_bounds(
                "longitude",
                self.lon_min,
                self.lon_max,
            ));
        }
        if self.lat_min > self.lat_max {
            return Err(ConfigError::inverted_bounds(
                "latitude",
                self.lat_min,
                self.lat_max,
            ));
        }
        Ok(())
    }
}

/// Bounds on the dataset's record count. Both bounds are exclusive: a dataset
/// with exactly `min_rows` or exactly `max_rows` records fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCountBounds {
    /// Lower bound (exclusive)
    pub min_rows: usize,
    /// Upper bound (exclusive)
    pub max_rows: usize,
}

impl RowCountBounds {
    /// Returns true if `count` lies strictly between the bounds.
    pub fn contains(&self, count: usize) -> bool {
        count > self.min_rows && count < self.max_rows
    }

    /// Rejects bounds that leave no admissible count.
    pub fn validate(&self) -> Result<()> {
        if self.min_rows >= self.max_rows {
            return Err(ConfigError::InvertedRowCountBounds {
                min_rows: self.min_rows,
                max_rows: self.max_rows,
            });
        }
        Ok(())
    }
}

/// Configuration for the cleaning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Minimum admissible price (inclusive)
    pub min_price: i64,

    /// Maximum admissible price (inclusive)
    pub max_price: i64,

    /// Geographic box rows must fall inside
    pub geo_bounds: GeoBounds,

    /// Column holding the price
    #[serde(default = "default_price_column")]
    pub price_column: String,

    /// Column holding the longitude
    #[serde(default = "default_longitude_column")]
    pub longitude_column: String,

    /// Column holding the latitude
    #[serde(default = "default_latitude_column")]
    pub latitude_column: String,

    /// Date-like column normalized during cleaning
    #[serde(default = "default_date_column")]
    pub date_column: String,
}

impl CleaningConfig {
    /// Rejects inverted price bounds or an inverted bounding box.
    pub fn validate(&self) -> Result<()> {
        if self.min_price > self.max_price {
            return Err(ConfigError::inverted_bounds(
                "price",
                self.min_price as f64,
                self.max_price as f64,
            ));
        }
        self.geo_bounds.validate()
    }
}

/// Configuration for the distributional drift check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Categorical column whose distribution is compared
    pub group_column: String,

    /// Strict upper bound on the KL divergence; a divergence equal to the
    /// threshold fails
    pub divergence_threshold: f64,
}

impl DriftConfig {
    /// Rejects a threshold that is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !self.divergence_threshold.is_finite() || self.divergence_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.divergence_threshold));
        }
        Ok(())
    }
}

/// Configuration for the validation gate.
///
/// `domain_rules` assembles the configured checks into the fixed evaluation
/// order: categorical membership rules (one per entry in `known_categories`,
/// in column order), price range, bounding box, row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Exact expected column sequence, order significant
    pub expected_schema: Schema,

    /// Allowed label sets per categorical column. A BTreeMap keeps rule
    /// order deterministic across runs.
    #[serde(default)]
    pub known_categories: BTreeMap<String, Vec<String>>,

    /// Closed interval the price column must stay within
    #[serde(default)]
    pub price_range: Option<NumericBounds>,

    /// Box the coordinate columns must stay within
    #[serde(default)]
    pub geo_bounds: Option<GeoBounds>,

    /// Exclusive bounds on the record count
    #[serde(default)]
    pub row_count_bounds: Option<RowCountBounds>,

    /// Drift check configuration
    pub drift: DriftConfig,

    /// Column holding the price
    #[serde(default = "default_price_column")]
    pub price_column: String,

    /// Column holding the longitude
    #[serde(default = "default_longitude_column")]
    pub longitude_column: String,

    /// Column holding the latitude
    #[serde(default = "default_latitude_column")]
    pub latitude_column: String,
}

impl ValidationConfig {
    /// Validates the whole section: non-empty schema, non-empty allowed sets,
    /// non-inverted bounds, admissible threshold.
    pub fn validate(&self) -> Result<()> {
        if self.expected_schema.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        for (column, allowed) in &self.known_categories {
            if allowed.is_empty() {
                return Err(ConfigError::EmptyAllowedValues(column.clone()));
            }
        }
        if let Some(range) = &self.price_range {
            range.validate(&self.price_column)?;
        }
        if let Some(bounds) = &self.geo_bounds {
            bounds.validate()?;
        }
        if let Some(bounds) = &self.row_count_bounds {
            bounds.validate()?;
        }
        self.drift.validate()
    }

    /// Assembles the configured domain rules in their fixed declaration order.
    pub fn domain_rules(&self) -> Vec<DomainRule> {
        let mut rules = Vec::new();

        for (column, allowed) in &self.known_categories {
            rules.push(DomainRule::CategoricalMembership {
                column: column.clone(),
                allowed: allowed.clone(),
            });
        }

        if let Some(bounds) = self.price_range {
            rules.push(DomainRule::NumericRange {
                column: self.price_column.clone(),
                bounds,
            });
        }

        if let Some(bounds) = self.geo_bounds {
            rules.push(DomainRule::BoundingBox {
                longitude_column: self.longitude_column.clone(),
                latitude_column: self.latitude_column.clone(),
                bounds,
            });
        }

        if let Some(bounds) = self.row_count_bounds {
            rules.push(DomainRule::RowCount { bounds });
        }

        rules
    }
}

/// A domain rule bound to one column (or, for row counts, the whole dataset).
#[derive(Debug, Clone, PartialEq)]
pub enum DomainRule {
    /// The set of distinct values observed in `column` must exactly equal
    /// `allowed`: unexpected labels and absent labels both fail.
    CategoricalMembership {
        column: String,
        allowed: Vec<String>,
    },

    /// Every value in `column` must lie within the closed interval.
    NumericRange {
        column: String,
        bounds: NumericBounds,
    },

    /// Each record's coordinate pair must jointly lie inside the box.
    BoundingBox {
        longitude_column: String,
        latitude_column: String,
        bounds: GeoBounds,
    },

    /// The record count must lie strictly between the bounds.
    RowCount { bounds: RowCountBounds },
}

impl DomainRule {
    /// Stable check name used in verdicts.
    pub fn name(&self) -> String {
        match self {
            DomainRule::CategoricalMembership { column, .. } => {
                format!("categorical_membership({column})")
            }
            DomainRule::NumericRange { column, .. } => format!("numeric_range({column})"),
            DomainRule::BoundingBox {
                longitude_column,
                latitude_column,
                ..
            } => format!("bounding_box({longitude_column}, {latitude_column})"),
            DomainRule::RowCount { .. } => "row_count".to_string(),
        }
    }
}

/// Configuration for the splitting stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of the full dataset assigned to the test partition
    pub test_size: f64,

    /// Fraction of the post-test remainder assigned to validation
    pub val_size: f64,

    /// Seed for the sampling generator; identical seeds reproduce identical
    /// partitions
    pub random_seed: u64,

    /// Column whose category proportions every partition preserves
    pub stratify_by: String,
}

impl SplitConfig {
    /// Rejects fractions outside the open interval (0, 1).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("test_size", self.test_size), ("val_size", self.val_size)] {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(ConfigError::invalid_fraction(name, value));
            }
        }
        Ok(())
    }
}

/// Top-level pipeline configuration covering all three stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cleaning stage options
    pub cleaning: CleaningConfig,

    /// Validation gate options
    pub validation: ValidationConfig,

    /// Splitting stage options
    pub split: SplitConfig,
}

impl PipelineConfig {
    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.cleaning.validate()?;
        self.validation.validate()?;
        self.split.validate()
    }
}
