//! Store traits implemented by the PostgreSQL backend.
//!
//! Higher layers depend on these rather than on `PgStore` directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_cache_core::{SearchRecord, UserRecord};

use crate::error::StorageError;

/// Search record persistence.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Insert one search record.
    async fn insert_search(&self, record: &SearchRecord) -> Result<(), StorageError>;

    /// Every stored search record, in no particular order.
    async fn fetch_all_searches(&self) -> Result<Vec<SearchRecord>, StorageError>;

    /// Newest record for exactly `search_term` created at or after `since`.
    async fn find_recent_search(
        &self,
        search_term: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SearchRecord>, StorageError>;
}

/// User record persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert one user record.
    async fn insert_user(&self, record: &UserRecord) -> Result<(), StorageError>;

    /// Every stored user record, in no particular order.
    async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, StorageError>;
}
