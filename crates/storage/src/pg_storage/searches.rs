//! SearchStore implementation for PgStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_cache_core::SearchRecord;
use sqlx::postgres::PgRow;

use super::{column, stored_timestamp, PgStore};
use crate::error::StorageError;
use crate::traits::SearchStore;

const SEARCH_COLUMNS: &str = "search_id, user_id, search_term, result, created_at";

fn row_to_search_record(row: &PgRow) -> Result<SearchRecord, StorageError> {
    Ok(SearchRecord::new(
        column(row, "search_id")?,
        column(row, "user_id")?,
        column(row, "search_term")?,
        column(row, "result")?,
        stored_timestamp(row, "created_at")?,
    ))
}

impl PgStore {
    async fn insert_search_once(&self, record: &SearchRecord) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "INSERT INTO search_results ({SEARCH_COLUMNS}) VALUES ($1, $2, $3, $4, $5)"
        ))
        .bind(&record.search_id)
        .bind(&record.user_id)
        .bind(&record.search_term)
        .bind(&record.result)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_all_searches_once(&self) -> Result<Vec<SearchRecord>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(&format!("SELECT {SEARCH_COLUMNS} FROM search_results"))
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        rows.iter().map(row_to_search_record).collect()
    }

    async fn find_recent_search_once(
        &self,
        search_term: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SearchRecord>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "SELECT {SEARCH_COLUMNS} FROM search_results
              WHERE search_term = $1 AND created_at >= $2
              ORDER BY created_at DESC
              LIMIT 1"
        ))
        .bind(search_term)
        .bind(since)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        row.as_ref().map(row_to_search_record).transpose()
    }
}

#[async_trait]
impl SearchStore for PgStore {
    async fn insert_search(&self, record: &SearchRecord) -> Result<(), StorageError> {
        self.retry
            .run("insert_search", StorageError::is_retryable, || self.insert_search_once(record))
            .await?;
        tracing::debug!(search_id = %record.search_id, user_id = %record.user_id, "search record inserted");
        Ok(())
    }

    async fn fetch_all_searches(&self) -> Result<Vec<SearchRecord>, StorageError> {
        let records = self
            .retry
            .run("fetch_all_searches", StorageError::is_retryable, || {
                self.fetch_all_searches_once()
            })
            .await?;
        tracing::debug!(count = records.len(), "fetched search records");
        Ok(records)
    }

    async fn find_recent_search(
        &self,
        search_term: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SearchRecord>, StorageError> {
        let found = self
            .retry
            .run("find_recent_search", StorageError::is_retryable, || {
                self.find_recent_search_once(search_term, since)
            })
            .await?;
        tracing::debug!(hit = found.is_some(), %since, "recent search lookup");
        Ok(found)
    }
}
