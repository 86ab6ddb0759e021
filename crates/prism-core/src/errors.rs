//! Cross-cutting error types for Prism.
//!
//! Domain-specific errors (`RegistryError`, `DatabaseError`, `TokenError`) live
//! in their own crates. `CoreError` covers failures of the shared frame model.

use thiserror::Error;

/// Errors raised while building or reading a [`crate::FeatureFrame`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A row does not have one cell per column.
    #[error("row has {actual} cells but frame has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// A required column is not present in the frame.
    #[error("column '{column}' not found")]
    ColumnMissing { column: String },

    /// A column holds a value that cannot be read as a number.
    #[error("column '{column}' is not numeric (value: {value})")]
    NotNumeric { column: String, value: String },

    /// Data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}
