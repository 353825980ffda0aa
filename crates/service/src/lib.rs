//! Service layer for search-cache
//!
//! Reuses stored search results for identical terms inside a rolling window
//! and stores fresh results on a miss.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod error;
mod search_cache_service;

pub use error::ServiceError;
pub use search_cache_service::{CacheOutcome, CachedSearch, SearchCacheService};
