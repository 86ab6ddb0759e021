//! Database error types for prism-db.

use thiserror::Error;

/// Errors from the feature database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A query failed or returned data that cannot be represented.
    #[error("Query failed: {0}")]
    Query(String),

    /// The database settings cannot be used to open a connection.
    #[error("Invalid database configuration: {0}")]
    Config(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
