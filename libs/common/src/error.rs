//! Custom error types for the common library
//!
//! This module defines the store-level error taxonomy shared by every
//! service that talks to the persistence layer.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store did not answer in time or the connection is gone
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A unique field already holds the given value
    #[error("Duplicate value for {field}")]
    Duplicate { field: String },

    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// An embedded document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether the failure is transient and an idempotent call may be repeated
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            SqlxError::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate {
                field: unique_field(db.constraint()),
            },
            SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => {
                StoreError::Serialization(err.to_string())
            }
            other => StoreError::Query(other),
        }
    }
}

/// Map a unique constraint name such as `users_email_key` to its column
fn unique_field(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.contains("email") => "email".to_string(),
        Some(name) if name.contains("phone") => "phone".to_string(),
        Some(name) => name.to_string(),
        None => "unknown".to_string(),
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
