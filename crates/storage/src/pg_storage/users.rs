//! UserStore implementation for PgStore.

use async_trait::async_trait;
use search_cache_core::UserRecord;
use sqlx::postgres::PgRow;

use super::{column, stored_timestamp, PgStore};
use crate::error::StorageError;
use crate::traits::UserStore;

fn row_to_user_record(row: &PgRow) -> Result<UserRecord, StorageError> {
    Ok(UserRecord::new(column(row, "user_id")?, stored_timestamp(row, "created_at")?))
}

impl PgStore {
    async fn insert_user_once(&self, record: &UserRecord) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO users (user_id, created_at) VALUES ($1, $2)")
            .bind(&record.user_id)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_all_users_once(&self) -> Result<Vec<UserRecord>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query("SELECT user_id, created_at FROM users").fetch_all(&mut *tx).await?;
        tx.commit().await?;
        rows.iter().map(row_to_user_record).collect()
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, record: &UserRecord) -> Result<(), StorageError> {
        self.retry
            .run("insert_user", StorageError::is_retryable, || self.insert_user_once(record))
            .await?;
        tracing::debug!(user_id = %record.user_id, "user record inserted");
        Ok(())
    }

    async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let users = self
            .retry
            .run("fetch_all_users", StorageError::is_retryable, || self.fetch_all_users_once())
            .await?;
        tracing::debug!(count = users.len(), "fetched user records");
        Ok(users)
    }
}
