//! # Pipeline Core
//!
//! Shared types for the listings data preparation pipeline. This crate defines:
//!
//! - Configuration structures for every stage (cleaning, validation, splitting),
//!   validated at construction time
//! - Domain rules evaluated by the validation gate
//! - Check results and the validation verdict returned to callers
//! - The configuration error taxonomy
//!
//! Data-quality failures are never errors: they are reported through
//! [`CheckResult`] and [`ValidationVerdict`]. [`ConfigError`] is reserved for
//! malformed configuration (empty schema, inverted bounds, a rule referencing a
//! column the dataset does not have) and always aborts the run.
//!
//! ## Example
//!
//! ```rust
//! use pipeline_core::ValidationConfigBuilder;
//!
//! let config = ValidationConfigBuilder::new(["id", "price", "neighbourhood_group"])
//!     .known_categories("neighbourhood_group", ["Bronx", "Brooklyn"])
//!     .price_range(10.0, 350.0)
//!     .drift("neighbourhood_group", 0.2)
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! ```

mod builder;
mod config;
mod error;
mod verdict;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use verdict::*;
