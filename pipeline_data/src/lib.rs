//! # Pipeline Data
//!
//! Data plumbing for the listings pipeline:
//!
//! - [`Dataset`] and [`DataValue`]: an ordered-column, typed tabular
//!   representation shared by every stage
//! - CSV reading and writing (header row, column order significant)
//! - [`ArtifactRef`], the [`ArtifactStore`] trait, and a local filesystem
//!   store with versioned directories and JSON lineage metadata
//!
//! ## Example
//!
//! ```rust
//! use pipeline_data::{DataValue, Dataset};
//!
//! let mut dataset = Dataset::new(vec!["id".to_string(), "price".to_string()]).unwrap();
//! dataset
//!     .push_row(vec![DataValue::Int(1), DataValue::Float(120.0)])
//!     .unwrap();
//!
//! assert_eq!(dataset.len(), 1);
//! assert!(dataset.has_column("price"));
//! ```

mod artifact;
mod csv_io;
mod dataset;
mod error;

pub use artifact::*;
pub use csv_io::*;
pub use dataset::*;
pub use error::*;
