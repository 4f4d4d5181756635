use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned across the import pipeline.
///
/// This is a single error enum shared by ingestion (CSV/JSON/Parquet/Feather,
/// optional Excel), staging, and the SQLite-backed table store.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected input: empty/invalid table name, unsupported file format,
    /// oversized upload.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A table (or record) with this name already exists.
    #[error("duplicate name: '{name}' already exists")]
    DuplicateName { name: String },

    /// The named table or record does not exist.
    #[error("not found: '{name}'")]
    NotFound { name: String },

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Feather (Arrow IPC) ingestion error.
    #[error("feather error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON ingestion error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value could not be converted into its inferred
    /// [`crate::types::DataType`].
    #[error("failed to convert value at row {row} column '{column}': {message} (raw='{raw}')")]
    Parse {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Database error from the table store.
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl ImportError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Map unique-constraint violations onto [`ImportError::DuplicateName`],
    /// leaving every other database error as [`ImportError::Sql`].
    pub(crate) fn from_sqlx(err: sqlx::Error, name: &str) -> Self {
        if let Some(db) = err.as_database_error() {
            if db.is_unique_violation() {
                return Self::DuplicateName {
                    name: name.to_string(),
                };
            }
        }
        Self::Sql(err)
    }
}
