//! PostgreSQL store using sqlx.
//!
//! Split into modular files by table. Every operation runs in its own
//! transaction on a pooled connection and goes through the store's
//! [`RetryPolicy`]. A transaction dropped before commit (error or
//! cancellation) rolls back and returns its connection to the pool.

mod searches;
mod users;

use std::time::Duration;

use chrono::{DateTime, Utc};
use search_cache_core::{
    env_parse_with_default, timestamp, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;
use crate::retry::RetryPolicy;

/// Connection pool sizing and timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: PG_POOL_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS),
        }
    }
}

impl PoolSettings {
    /// Defaults, overridden by `SEARCH_CACHE_PG_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_connections: env_parse_with_default(
                "SEARCH_CACHE_PG_MAX_CONNECTIONS",
                PG_POOL_MAX_CONNECTIONS,
            ),
            acquire_timeout: Duration::from_secs(env_parse_with_default(
                "SEARCH_CACHE_PG_ACQUIRE_TIMEOUT_SECS",
                PG_POOL_ACQUIRE_TIMEOUT_SECS,
            )),
            idle_timeout: Duration::from_secs(env_parse_with_default(
                "SEARCH_CACHE_PG_IDLE_TIMEOUT_SECS",
                PG_POOL_IDLE_TIMEOUT_SECS,
            )),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections.max(1))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .test_before_acquire(true)
    }
}

/// Search and user record store backed by a PostgreSQL pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgStore {
    /// Connect with pool settings from the environment and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PoolSettings::from_env().pool_options().connect(database_url).await?;
        Self::init(pool).await
    }

    /// Connect with explicit options and run migrations.
    pub async fn connect_with(
        options: PgConnectOptions,
        settings: PoolSettings,
    ) -> Result<Self, StorageError> {
        let pool = settings.pool_options().connect_with(options).await?;
        Self::init(pool).await
    }

    async fn init(pool: PgPool) -> Result<Self, StorageError> {
        run_pg_migrations(&pool).await?;
        tracing::info!(max_connections = pool.options().get_max_connections(), "PgStore initialized");
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool. The schema is assumed to exist.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool, retry: RetryPolicy::default() }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Typed column read; any failure is a decode error for `column`.
pub(crate) fn column<'r, T>(row: &'r PgRow, column: &'static str) -> Result<T, StorageError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column).map_err(|e| StorageError::decode(column, e))
}

/// Stored timestamp, normalized to the fixed whole-second record format.
pub(crate) fn stored_timestamp(
    row: &PgRow,
    name: &'static str,
) -> Result<DateTime<Utc>, StorageError> {
    let raw: DateTime<Utc> = column(row, name)?;
    let formatted = timestamp::format_timestamp(&raw);
    timestamp::parse_timestamp(&formatted).map_err(|e| StorageError::decode(name, e))
}
