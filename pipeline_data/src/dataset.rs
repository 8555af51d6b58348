//! Dataset representation shared by every pipeline stage.
//!
//! A [`Dataset`] is an ordered sequence of records over a fixed, ordered
//! column list. All rows share the same column set and order; the arity is
//! enforced on every insert. Stages never mutate a dataset they received:
//! cleaning and splitting materialize new datasets from the input.

use crate::{DataError, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A typed value in a dataset cell.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Calendar date
    Date(NaiveDate),
}

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::String(_) => "string",
            DataValue::Date(_) => "date",
        }
    }

    /// Attempts to get this value as a float. Integers coerce.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DataValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    /// The CSV cell representation: null is the empty field, dates are
    /// ISO `%Y-%m-%d`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => Ok(()),
            DataValue::Int(i) => write!(f, "{i}"),
            DataValue::Float(v) => write!(f, "{v}"),
            DataValue::String(s) => write!(f, "{s}"),
            DataValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<NaiveDate> for DataValue {
    fn from(d: NaiveDate) -> Self {
        DataValue::Date(d)
    }
}

/// An ordered-column tabular dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<DataValue>>,
}

impl Dataset {
    /// Creates an empty dataset over the given column sequence.
    ///
    /// Fails on duplicate column names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.clone(), position).is_some() {
                return Err(DataError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self {
            columns,
            index,
            rows: Vec::new(),
        })
    }

    /// Appends a row. Fails if the arity does not match the columns.
    pub fn push_row(&mut self, row: Vec<DataValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DataError::RowArity {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if the dataset has the column.
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[DataValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterates over one column's values, if the column exists.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &DataValue>> {
        let position = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[position]))
    }

    /// Returns the value at (row, column), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&DataValue> {
        let position = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[position])
    }

    /// Materializes a new dataset holding only the rows the predicate keeps.
    pub fn filter_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&[DataValue]) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// Materializes a new dataset holding the rows at the given indices, in
    /// the given order. Out-of-range indices are skipped.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i))
                .cloned()
                .collect(),
        }
    }

    /// Materializes a new dataset with one column rewritten by `f`.
    ///
    /// Returns `None` if the column does not exist.
    pub fn map_column<F>(&self, name: &str, mut f: F) -> Option<Dataset>
    where
        F: FnMut(&DataValue) -> DataValue,
    {
        let position = self.column_index(name)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[position] = f(&row[position]);
                row
            })
            .collect();
        Some(Dataset {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows,
        })
    }

    /// Frequency of each distinct non-null label in a categorical column,
    /// keyed in lexicographic order. Nulls do not form a category.
    pub fn value_counts(&self, name: &str) -> Option<BTreeMap<String, u64>> {
        let values = self.column_values(name)?;
        let mut counts = BTreeMap::new();
        for value in values {
            if value.is_null() {
                continue;
            }
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listings() -> Dataset {
        let mut dataset = Dataset::new(vec![
            "id".to_string(),
            "neighbourhood_group".to_string(),
            "price".to_string(),
        ])
        .unwrap();
        dataset
            .push_row(vec![1.into(), "Bronx".into(), 50.0.into()])
            .unwrap();
        dataset
            .push_row(vec![2.into(), "Brooklyn".into(), 120.0.into()])
            .unwrap();
        dataset
            .push_row(vec![3.into(), "Bronx".into(), DataValue::Null])
            .unwrap();
        dataset
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Dataset::new(vec!["id".to_string(), "id".to_string()]);
        assert!(matches!(result, Err(DataError::DuplicateColumn(_))));
    }

    #[test]
    fn test_row_arity_enforced() {
        let mut dataset = Dataset::new(vec!["id".to_string(), "price".to_string()]).unwrap();
        let result = dataset.push_row(vec![1.into()]);
        assert!(matches!(
            result,
            Err(DataError::RowArity {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_column_access() {
        let dataset = listings();
        assert_eq!(dataset.column_index("price"), Some(2));
        assert_eq!(dataset.column_index("unknown"), None);
        assert_eq!(
            dataset.value(1, "neighbourhood_group"),
            Some(&DataValue::String("Brooklyn".to_string()))
        );
    }

    #[test]
    fn test_filter_rows_keeps_columns() {
        let dataset = listings();
        let filtered = dataset.filter_rows(|row| {
            row[2].as_float().map(|price| price >= 100.0).unwrap_or(false)
        });
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.columns(), dataset.columns());
    }

    #[test]
    fn test_select_rows_preserves_order() {
        let dataset = listings();
        let selected = dataset.select_rows(&[2, 0]);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.value(0, "id"), Some(&DataValue::Int(3)));
        assert_eq!(selected.value(1, "id"), Some(&DataValue::Int(1)));
    }

    #[test]
    fn test_map_column() {
        let dataset = listings();
        let doubled = dataset
            .map_column("price", |value| match value.as_float() {
                Some(price) => DataValue::Float(price * 2.0),
                None => DataValue::Null,
            })
            .unwrap();
        assert_eq!(doubled.value(0, "price"), Some(&DataValue::Float(100.0)));
        assert_eq!(doubled.value(2, "price"), Some(&DataValue::Null));
    }

    #[test]
    fn test_value_counts_skips_nulls() {
        let dataset = listings();
        let counts = dataset.value_counts("neighbourhood_group").unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["Bronx"], 2);
        assert_eq!(counts["Brooklyn"], 1);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(DataValue::Null.to_string(), "");
        assert_eq!(DataValue::Int(42).to_string(), "42");
        assert_eq!(DataValue::Float(40.5).to_string(), "40.5");
        assert_eq!(
            DataValue::Date(NaiveDate::from_ymd_opt(2019, 5, 21).unwrap()).to_string(),
            "2019-05-21"
        );
    }
}
