//! Core types for search-cache
//!
//! Record types shared by the storage, service and CLI crates, plus the
//! configuration needed to reach the database.

mod config;
mod constants;
mod env_config;
mod error;
mod record;
pub mod timestamp;

pub use config::{AppConfig, DatabaseConfig, DEFAULT_CONFIG_PATH, resolve_database_url};
pub use constants::*;
pub use env_config::env_parse_with_default;
pub use error::CoreError;
pub use record::{SearchRecord, UserRecord};
