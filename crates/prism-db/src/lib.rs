//! # prism-db
//!
//! Feature rows for predictions, read from a libSQL database.
//!
//! The feature table is `features`, keyed by an integer `sample_id` column.
//! Every other column is passed through to the feature pipeline untouched.
//! One [`libsql::Database`] handle is shared by the process; each lookup opens
//! its own connection, which is dropped when the lookup returns.

pub mod error;

use async_trait::async_trait;
use libsql::{Builder, Value};
use prism_config::{DatabaseConfig, DatabaseTarget};
use prism_core::{Cell, FeatureFrame};

pub use error::DatabaseError;

/// Parameterized lookup of one sample's feature row.
pub const FEATURE_QUERY: &str = "SELECT * FROM features WHERE sample_id = ?1";

/// Source of raw feature rows.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// All rows whose `sample_id` equals `sample_id`. An empty frame means
    /// the sample does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError`] if the database cannot be reached or the
    /// query fails.
    async fn fetch_sample(&self, sample_id: i64) -> Result<FeatureFrame, DatabaseError>;
}

/// [`FeatureSource`] backed by a libSQL database (local file or remote).
pub struct LibSqlFeatureSource {
    db: libsql::Database,
}

impl std::fmt::Debug for LibSqlFeatureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibSqlFeatureSource").finish_non_exhaustive()
    }
}

impl LibSqlFeatureSource {
    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Config`] if no database is configured, or
    /// [`DatabaseError::LibSql`] if the database cannot be opened.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if !config.is_configured() {
            return Err(DatabaseError::Config(
                "set database.host or database.name".into(),
            ));
        }

        let db = match config.target() {
            DatabaseTarget::Local { path } => Builder::new_local(path).build().await?,
            DatabaseTarget::Remote { url, auth_token } => {
                Builder::new_remote(url, auth_token).build().await?
            }
        };
        tracing::info!(database = %config.describe(), "feature database opened");
        Ok(Self { db })
    }

    /// Open a local database file directly.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::LibSql`] if the file cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Ok(Self { db })
    }

    /// A fresh connection to the underlying database.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::LibSql`] if the connection cannot be opened.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        Ok(self.db.connect()?)
    }
}

#[async_trait]
impl FeatureSource for LibSqlFeatureSource {
    async fn fetch_sample(&self, sample_id: i64) -> Result<FeatureFrame, DatabaseError> {
        let conn = self.connect()?;
        let mut rows = conn.query(FEATURE_QUERY, [sample_id]).await?;

        let columns: Vec<String> = (0..rows.column_count())
            .map(|i| rows.column_name(i).unwrap_or_default().to_string())
            .collect();
        let mut frame = FeatureFrame::new(columns);

        while let Some(row) = rows.next().await? {
            let mut cells = Vec::with_capacity(frame.columns().len());
            for (idx, name) in (0..).zip(frame.columns()) {
                cells.push(to_cell(name, row.get_value(idx)?)?);
            }
            frame
                .push_row(cells)
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
        }

        tracing::debug!(sample_id, rows = frame.len(), "feature rows fetched");
        Ok(frame)
    }
}

fn to_cell(column: &str, value: Value) -> Result<Cell, DatabaseError> {
    Ok(match value {
        Value::Null => Cell::Null,
        Value::Integer(v) => Cell::Integer(v),
        Value::Real(v) => Cell::Real(v),
        Value::Text(v) => Cell::Text(v),
        Value::Blob(bytes) => Cell::Text(String::from_utf8(bytes).map_err(|_| {
            DatabaseError::Query(format!("column '{column}' holds binary data"))
        })?),
    })
}
