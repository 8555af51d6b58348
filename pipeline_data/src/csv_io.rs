//! CSV reading and writing.
//!
//! The on-disk representation exchanged between stages is comma-separated
//! values with a header row; the header defines the column order. Fields are
//! typed on read: empty fields become null, then integer, then float, then
//! string. Date columns arrive as strings and are normalized by the cleaner.

use crate::{DataValue, Dataset, Result};
use std::path::Path;
use tracing::debug;

/// Parses one CSV field into a typed value.
fn parse_field(field: &str) -> DataValue {
    if field.is_empty() {
        return DataValue::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return DataValue::Int(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return DataValue::Float(f);
    }
    DataValue::String(field.to_string())
}

/// Reads a dataset from a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(false).from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|column| column.to_string())
        .collect();
    let mut dataset = Dataset::new(columns)?;

    for record in reader.records() {
        let record = record?;
        let row: Vec<DataValue> = record.iter().map(parse_field).collect();
        dataset.push_row(row)?;
    }

    debug!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        path = %path.display(),
        "read dataset"
    );
    Ok(dataset)
}

/// Writes a dataset to a CSV file with a header row, preserving column order.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;

    debug!(rows = dataset.len(), path = %path.display(), "wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_field_typing() {
        assert_eq!(parse_field(""), DataValue::Null);
        assert_eq!(parse_field("42"), DataValue::Int(42));
        assert_eq!(parse_field("-73.95"), DataValue::Float(-73.95));
        assert_eq!(
            parse_field("Brooklyn"),
            DataValue::String("Brooklyn".to_string())
        );
        // Date-like strings stay strings until the cleaner normalizes them
        assert_eq!(
            parse_field("2019-05-21"),
            DataValue::String("2019-05-21".to_string())
        );
    }

    #[test]
    fn test_read_csv_types_and_nulls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.csv");
        fs::write(
            &path,
            "id,neighbourhood_group,price,last_review\n\
             1,Brooklyn,149,2019-05-21\n\
             2,Manhattan,225.5,\n",
        )
        .unwrap();

        let dataset = read_csv(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.columns(),
            &["id", "neighbourhood_group", "price", "last_review"]
        );
        assert_eq!(dataset.value(0, "price"), Some(&DataValue::Int(149)));
        assert_eq!(dataset.value(1, "price"), Some(&DataValue::Float(225.5)));
        assert_eq!(dataset.value(1, "last_review"), Some(&DataValue::Null));
    }

    #[test]
    fn test_round_trip_preserves_column_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let mut dataset = Dataset::new(vec![
            "id".to_string(),
            "price".to_string(),
            "last_review".to_string(),
        ])
        .unwrap();
        dataset
            .push_row(vec![
                DataValue::Int(1),
                DataValue::Float(99.5),
                DataValue::Null,
            ])
            .unwrap();

        write_csv(&dataset, &path).unwrap();
        let reread = read_csv(&path).unwrap();

        assert_eq!(reread.columns(), dataset.columns());
        assert_eq!(reread.len(), 1);
        assert_eq!(reread.value(0, "last_review"), Some(&DataValue::Null));
    }
}
