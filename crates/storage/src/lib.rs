//! Storage layer for search-cache
//!
//! PostgreSQL persistence for search records and users. Every operation is
//! a single parameterized statement inside its own transaction, retried with
//! exponential backoff on database errors.

mod error;
mod pg_migrations;
mod pg_storage;
mod retry;
pub mod traits;

pub use error::StorageError;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::{PgStore, PoolSettings};
pub use retry::RetryPolicy;
pub use traits::{SearchStore, UserStore};
