//! # Pipeline Clean
//!
//! The cleaning stage of the listings pipeline. Removes price outliers and
//! rows outside the geographic bounding box, then normalizes the designated
//! date column to a canonical date type.
//!
//! Guarantees:
//!
//! - The output never has more rows than the input and never introduces
//!   new rows.
//! - Rows whose price is null or non-numeric are removed by the price
//!   filter, like any out-of-range price.
//! - Date values that cannot be parsed are set to null, not dropped; the
//!   count of nulled values is reported in the [`CleanReport`].

use chrono::NaiveDate;
use pipeline_core::{CleaningConfig, ConfigError};
use pipeline_data::{DataValue, Dataset};
use tracing::info;

/// Accepted input formats for the date column, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Row accounting for one cleaning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Rows in the input dataset
    pub input_rows: usize,
    /// Rows removed by the price filter
    pub price_outliers: usize,
    /// Rows removed by the bounding-box filter
    pub geo_outliers: usize,
    /// Non-null date values that failed to parse and were nulled
    pub unparsed_dates: usize,
    /// Rows in the output dataset
    pub output_rows: usize,
}

/// The cleaning stage.
#[derive(Debug, Default)]
pub struct Cleaner;

impl Cleaner {
    /// Creates a new cleaner.
    pub fn new() -> Self {
        Self
    }

    /// Cleans a dataset: price filter, bounding-box filter, date
    /// normalization. Returns the cleaned dataset and a row-accounting
    /// report.
    ///
    /// Columns the configuration references must exist in the dataset;
    /// otherwise this is a configuration error.
    pub fn clean(
        &self,
        dataset: &Dataset,
        config: &CleaningConfig,
    ) -> Result<(Dataset, CleanReport), ConfigError> {
        config.validate()?;
        for column in [
            &config.price_column,
            &config.longitude_column,
            &config.latitude_column,
            &config.date_column,
        ] {
            if !dataset.has_column(column) {
                return Err(ConfigError::missing_column(column, "cleaning", "input"));
            }
        }

        let input_rows = dataset.len();
        info!(rows = input_rows, "shape before price filter");

        // Drop price outliers; a null or non-numeric price never satisfies
        // the closed interval.
        let price_idx = dataset
            .column_index(&config.price_column)
            .expect("column checked above");
        let min_price = config.min_price as f64;
        let max_price = config.max_price as f64;
        let priced = dataset.filter_rows(|row| {
            row[price_idx]
                .as_float()
                .map(|price| price >= min_price && price <= max_price)
                .unwrap_or(false)
        });
        let price_outliers = input_rows - priced.len();
        info!(rows = priced.len(), "shape after price filter");

        // Drop rows outside the bounding box
        let lon_idx = priced
            .column_index(&config.longitude_column)
            .expect("column checked above");
        let lat_idx = priced
            .column_index(&config.latitude_column)
            .expect("column checked above");
        let bounds = config.geo_bounds;
        let boxed = priced.filter_rows(|row| {
            match (row[lon_idx].as_float(), row[lat_idx].as_float()) {
                (Some(lon), Some(lat)) => bounds.contains(lon, lat),
                _ => false,
            }
        });
        let geo_outliers = priced.len() - boxed.len();
        info!(rows = boxed.len(), "shape after bounding-box filter");

        // Normalize the date column; unparseable values become null
        let mut unparsed_dates = 0usize;
        let cleaned = boxed
            .map_column(&config.date_column, |value| match value {
                DataValue::Null => DataValue::Null,
                DataValue::Date(date) => DataValue::Date(*date),
                other => match parse_date(&other.to_string()) {
                    Some(date) => DataValue::Date(date),
                    None => {
                        unparsed_dates += 1;
                        DataValue::Null
                    }
                },
            })
            .expect("column checked above");
        info!(
            column = %config.date_column,
            unparsed = unparsed_dates,
            "date column normalized"
        );

        let report = CleanReport {
            input_rows,
            price_outliers,
            geo_outliers,
            unparsed_dates,
            output_rows: cleaned.len(),
        };
        Ok((cleaned, report))
    }
}

/// Tries each accepted date format in order.
fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_core::GeoBounds;
    use pretty_assertions::assert_eq;

    fn config() -> CleaningConfig {
        CleaningConfig {
            min_price: 10,
            max_price: 350,
            geo_bounds: GeoBounds {
                lon_min: -74.25,
                lon_max: -73.50,
                lat_min: 40.5,
                lat_max: 41.2,
            },
            price_column: "price".to_string(),
            longitude_column: "longitude".to_string(),
            latitude_column: "latitude".to_string(),
            date_column: "last_review".to_string(),
        }
    }

    fn listing(price: DataValue, lon: f64, lat: f64, review: DataValue) -> Vec<DataValue> {
        vec![price, lon.into(), lat.into(), review]
    }

    fn dataset(rows: Vec<Vec<DataValue>>) -> Dataset {
        let mut dataset = Dataset::new(vec![
            "price".to_string(),
            "longitude".to_string(),
            "latitude".to_string(),
            "last_review".to_string(),
        ])
        .unwrap();
        for row in rows {
            dataset.push_row(row).unwrap();
        }
        dataset
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let input = dataset(vec![
            listing(10.into(), -73.9, 40.8, DataValue::Null),
            listing(350.into(), -73.9, 40.8, DataValue::Null),
            listing(9.into(), -73.9, 40.8, DataValue::Null),
            listing(351.into(), -73.9, 40.8, DataValue::Null),
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input, &config()).unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(report.price_outliers, 2);
    }

    #[test]
    fn test_null_price_dropped() {
        let input = dataset(vec![
            listing(DataValue::Null, -73.9, 40.8, DataValue::Null),
            listing(100.into(), -73.9, 40.8, DataValue::Null),
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input, &config()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(report.price_outliers, 1);
    }

    #[test]
    fn test_geo_filter_requires_both_coordinates_in_box() {
        let input = dataset(vec![
            listing(100.into(), -73.9, 40.8, DataValue::Null), // inside
            listing(100.into(), -75.0, 40.8, DataValue::Null), // lon out
            listing(100.into(), -73.9, 42.0, DataValue::Null), // lat out
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input, &config()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(report.geo_outliers, 2);
    }

    #[test]
    fn test_date_normalization() {
        let input = dataset(vec![
            listing(100.into(), -73.9, 40.8, "2019-05-21".into()),
            listing(100.into(), -73.9, 40.8, "06/23/2019".into()),
            listing(100.into(), -73.9, 40.8, "not a date".into()),
            listing(100.into(), -73.9, 40.8, DataValue::Null),
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input, &config()).unwrap();
        assert_eq!(
            cleaned.value(0, "last_review"),
            Some(&DataValue::Date(
                NaiveDate::from_ymd_opt(2019, 5, 21).unwrap()
            ))
        );
        assert_eq!(
            cleaned.value(1, "last_review"),
            Some(&DataValue::Date(
                NaiveDate::from_ymd_opt(2019, 6, 23).unwrap()
            ))
        );
        // Unparseable values are nulled, not dropped
        assert_eq!(cleaned.value(2, "last_review"), Some(&DataValue::Null));
        assert_eq!(cleaned.value(3, "last_review"), Some(&DataValue::Null));
        assert_eq!(cleaned.len(), 4);
        assert_eq!(report.unparsed_dates, 1);
    }

    #[test]
    fn test_report_accounting_consistent() {
        let input = dataset(vec![
            listing(5.into(), -73.9, 40.8, DataValue::Null),
            listing(100.into(), -80.0, 40.8, DataValue::Null),
            listing(100.into(), -73.9, 40.8, DataValue::Null),
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input, &config()).unwrap();
        assert_eq!(report.input_rows, 3);
        assert_eq!(report.output_rows, cleaned.len());
        assert_eq!(
            report.output_rows,
            report.input_rows - report.price_outliers - report.geo_outliers
        );
        assert!(report.output_rows <= report.input_rows);
    }

    #[test]
    fn test_missing_column_is_config_error() {
        let mut input = Dataset::new(vec!["price".to_string()]).unwrap();
        input.push_row(vec![100.into()]).unwrap();

        let result = Cleaner::new().clean(&input, &config());
        assert!(matches!(result, Err(ConfigError::MissingColumn { .. })));
    }

    #[test]
    fn test_inverted_price_bounds_rejected() {
        let mut bad = config();
        bad.min_price = 500;
        let input = dataset(vec![listing(100.into(), -73.9, 40.8, DataValue::Null)]);

        let result = Cleaner::new().clean(&input, &bad);
        assert!(matches!(result, Err(ConfigError::InvertedBounds { .. })));
    }
}
