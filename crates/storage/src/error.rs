//! Typed error enum for the storage layer.
//!
//! Database failures keep the driver's `sqlx::Error` intact so callers see the
//! original cause once retries are exhausted.

use thiserror::Error;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL / connection / constraint / timeout failure reported by the driver.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Row could not be mapped into a record.
    #[error("failed to decode column {column}: {source}")]
    Deserialization {
        column: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema setup failure.
    #[error("migration error: {0}")]
    Migration(#[source] sqlx::Error),
}

impl StorageError {
    /// Whether the retry loop should try again. Every driver error qualifies;
    /// decoding failures never do.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Whether this error is likely transient (connectivity, pool exhaustion).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Database(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }

    /// Whether this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().is_some_and(|c| c == UNIQUE_VIOLATION)
            },
            _ => false,
        }
    }

    pub(crate) fn decode(
        column: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Deserialization { column, source: source.into() }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}
