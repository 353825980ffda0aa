//! Typed error enum for the service layer.

use search_cache_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed after its retries.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The upstream search provider failed; nothing was cached.
    #[error("search provider: {0}")]
    Provider(#[source] anyhow::Error),

    /// Caller provided invalid input (blank search term).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            _ => false,
        }
    }
}
