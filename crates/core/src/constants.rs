//! Shared constants for search-cache.

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Attempts per store operation, first try included.
pub const DB_RETRY_MAX_ATTEMPTS: u32 = 5;

/// Delay before the first retry, in milliseconds.
pub const DB_RETRY_INITIAL_DELAY_MS: u64 = 10;

/// Multiplier applied to the delay after each failed retry.
pub const DB_RETRY_BACKOFF_FACTOR: u32 = 2;

/// Maximum random offset (either direction) added to each retry delay, in milliseconds.
pub const DB_RETRY_JITTER_MS: u64 = 10;

/// How long a stored search result is reused for the same term.
pub const SEARCH_CACHE_WINDOW_SECS: i64 = 3600;
