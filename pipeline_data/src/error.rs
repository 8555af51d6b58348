//! Error types for dataset and artifact operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading, writing, or storing datasets.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row whose arity does not match the dataset's columns
    #[error("row has {found} values but the dataset has {expected} columns")]
    RowArity { expected: usize, found: usize },

    /// Duplicate column name in a header
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Malformed artifact reference
    #[error("invalid artifact reference '{reference}': {reason}")]
    InvalidArtifactRef { reference: String, reason: String },

    /// Artifact or version missing from the store
    #[error("artifact '{0}' not found in the store")]
    ArtifactNotFound(String),

    /// Artifact metadata could not be read or written
    #[error("artifact metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl DataError {
    /// Creates an invalid artifact reference error.
    pub fn invalid_ref(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArtifactRef {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}
