//! Custom error types for the common library
//!
//! Every failure coming out of the record tables or the object storage is
//! reported as a [`BackendError`]. Callers do not distinguish transient from
//! permanent failures; nothing in this crate retries.

use sqlx::Error as SqlxError;
use thiserror::Error;
use uuid::Uuid;

/// Uniform error signal for the record tables and the object storage
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error occurred while connecting to the database
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during query execution (constraint violations included)
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Backend configuration error: {0}")]
    Configuration(String),

    /// A stored row could not be mapped onto its record type
    #[error("Malformed {table} row: {reason}")]
    Decode {
        table: &'static str,
        reason: String,
    },

    /// Update or lookup of a primary key that does not exist
    #[error("No {table} record with id {id}")]
    NotFound { table: &'static str, id: Uuid },

    /// Object storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackendError {
    /// True when the error is a missing primary key
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }
}

/// Type alias for Result with BackendError
pub type BackendResult<T> = Result<T, BackendError>;
