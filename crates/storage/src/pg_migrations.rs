//! PostgreSQL schema migrations for search-cache storage.

use sqlx::PgPool;

use crate::error::StorageError;

/// Create the `users` and `search_results` tables and their indexes if missing.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(StorageError::Migration)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_results (
            search_id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users (user_id),
            search_term TEXT NOT NULL,
            result TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(StorageError::Migration)?;

    // Cache lookups: exact term, newest first
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_search_term_created
           ON search_results (search_term, created_at DESC)",
    )
    .execute(pool)
    .await
    .map_err(StorageError::Migration)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_search_user ON search_results (user_id)")
        .execute(pool)
        .await
        .map_err(StorageError::Migration)?;

    tracing::info!("PostgreSQL migrations complete");
    Ok(())
}
