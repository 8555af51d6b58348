//! # Pipeline Validator
//!
//! The validation gate for the listings pipeline. This crate decides whether
//! a candidate dataset is fit to enter training:
//!
//! - Schema validation (exact column sequence, order included)
//! - Domain validation (categorical membership, numeric ranges, bounding box,
//!   row count bounds)
//! - Distributional drift (KL divergence against a reference dataset)
//!
//! Checks never raise for failing data; they report through
//! [`pipeline_core::CheckResult`]. Only malformed configuration — a rule
//! referencing a missing column, an empty schema, inverted bounds — aborts
//! with a [`pipeline_core::ConfigError`].
//!
//! ## Example
//!
//! ```rust
//! use pipeline_core::ValidationConfigBuilder;
//! use pipeline_data::Dataset;
//! use pipeline_validator::ValidationGate;
//!
//! let mut dataset = Dataset::new(vec!["neighbourhood_group".to_string()]).unwrap();
//! dataset.push_row(vec!["Brooklyn".into()]).unwrap();
//!
//! let config = ValidationConfigBuilder::new(["neighbourhood_group"])
//!     .drift("neighbourhood_group", 0.2)
//!     .build();
//!
//! let verdict = ValidationGate::new()
//!     .validate(&dataset, &dataset, &config)
//!     .unwrap();
//! assert!(verdict.passed());
//! ```

mod domain;
mod drift;
mod gate;
mod schema;

pub use domain::*;
pub use drift::*;
pub use gate::*;
pub use schema::*;
