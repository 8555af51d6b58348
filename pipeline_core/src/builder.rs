//! Builder for the validation gate configuration.
//!
//! Configuration normally arrives from a YAML or TOML file; the builder is
//! the ergonomic path for constructing a [`ValidationConfig`] in code, which
//! the test suites lean on heavily.

use crate::{
    DriftConfig, GeoBounds, NumericBounds, RowCountBounds, Schema, ValidationConfig,
};
use std::collections::BTreeMap;

/// Builder for [`ValidationConfig`].
///
/// # Example
///
/// ```rust
/// use pipeline_core::ValidationConfigBuilder;
///
/// let config = ValidationConfigBuilder::new(["id", "neighbourhood_group", "price"])
///     .known_categories("neighbourhood_group", ["Bronx", "Brooklyn"])
///     .price_range(10.0, 350.0)
///     .row_count_bounds(15_000, 100_000)
///     .drift("neighbourhood_group", 0.2)
///     .build();
/// ```
#[derive(Debug)]
pub struct ValidationConfigBuilder {
    expected_schema: Schema,
    known_categories: BTreeMap<String, Vec<String>>,
    price_range: Option<NumericBounds>,
    geo_bounds: Option<GeoBounds>,
    row_count_bounds: Option<RowCountBounds>,
    drift: Option<DriftConfig>,
    price_column: String,
    longitude_column: String,
    latitude_column: String,
}

impl ValidationConfigBuilder {
    /// Creates a builder with the expected column sequence.
    pub fn new<I, S>(expected_schema: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected_schema: Schema::new(expected_schema),
            known_categories: BTreeMap::new(),
            price_range: None,
            geo_bounds: None,
            row_count_bounds: None,
            drift: None,
            price_column: "price".to_string(),
            longitude_column: "longitude".to_string(),
            latitude_column: "latitude".to_string(),
        }
    }

    /// Adds a categorical membership rule for `column`.
    pub fn known_categories<I, S>(mut self, column: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_categories.insert(
            column.into(),
            allowed.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Sets the closed price interval.
    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(NumericBounds::new(min, max));
        self
    }

    /// Sets the coordinate bounding box.
    pub fn geo_bounds(mut self, lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        self.geo_bounds = Some(GeoBounds {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        });
        self
    }

    /// Sets the exclusive record-count bounds.
    pub fn row_count_bounds(mut self, min_rows: usize, max_rows: usize) -> Self {
        self.row_count_bounds = Some(RowCountBounds { min_rows, max_rows });
        self
    }

    /// Configures the drift check.
    pub fn drift(mut self, group_column: impl Into<String>, divergence_threshold: f64) -> Self {
        self.drift = Some(DriftConfig {
            group_column: group_column.into(),
            divergence_threshold,
        });
        self
    }

    /// Overrides the price column name.
    pub fn price_column(mut self, column: impl Into<String>) -> Self {
        self.price_column = column.into();
        self
    }

    /// Overrides the coordinate column names.
    pub fn coordinate_columns(
        mut self,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
    ) -> Self {
        self.longitude_column = longitude.into();
        self.latitude_column = latitude.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the drift check was not configured; every gate invocation
    /// needs one.
    pub fn build(self) -> ValidationConfig {
        ValidationConfig {
            expected_schema: self.expected_schema,
            known_categories: self.known_categories,
            price_range: self.price_range,
            geo_bounds: self.geo_bounds,
            row_count_bounds: self.row_count_bounds,
            drift: self.drift.expect("drift configuration is required"),
            price_column: self.price_column,
            longitude_column: self.longitude_column,
            latitude_column: self.latitude_column,
        }
    }
}
