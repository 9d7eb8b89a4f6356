/**
 * Record Store Errors
 *
 * - `Validation` - Bad caller input; never retried
 * - `NotFound` - No single matching row
 * - `Duplicate` - The entry id is already in use by a live record
 * - `Unavailable` - Connectivity to the backing store failed; safe to retry
 * - `Backend` - Any other database failure
 */

use thiserror::Error;

use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Backend(#[source] sqlx::Error),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Only connectivity failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<SharedError> for StoreError {
    fn from(err: SharedError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                Self::NotFound("record owner does not exist".to_string())
            }
            other => Self::Backend(other),
        }
    }
}
