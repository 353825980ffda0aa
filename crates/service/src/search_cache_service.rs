use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use search_cache_core::{env_parse_with_default, SearchRecord, SEARCH_CACHE_WINDOW_SECS};
use search_cache_storage::SearchStore;

use crate::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from a record stored inside the window.
    Hit,
    /// Fetched from the provider and stored.
    Miss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSearch {
    pub record: SearchRecord,
    pub outcome: CacheOutcome,
}

pub struct SearchCacheService<S: ?Sized> {
    store: Arc<S>,
    window: Duration,
}

impl<S: SearchStore + ?Sized> SearchCacheService<S> {
    #[must_use]
    pub fn new(store: Arc<S>, window: Duration) -> Self {
        Self { store, window }
    }

    /// Window from `SEARCH_CACHE_WINDOW_SECS`, one hour by default.
    #[must_use]
    pub fn from_env(store: Arc<S>) -> Self {
        let secs = env_parse_with_default("SEARCH_CACHE_WINDOW_SECS", SEARCH_CACHE_WINDOW_SECS);
        Self::new(store, Duration::seconds(secs.clamp(0, i64::MAX / 1000)))
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Return the newest stored result for `search_term` inside the window, or
    /// call `fetch` and store what it returns under `user_id`.
    pub async fn cached_search<F, Fut>(
        &self,
        user_id: &str,
        search_term: &str,
        fetch: F,
    ) -> Result<CachedSearch, ServiceError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = anyhow::Result<String>>,
    {
        if search_term.trim().is_empty() {
            return Err(ServiceError::InvalidInput("search term is empty".to_owned()));
        }

        let since =
            Utc::now().checked_sub_signed(self.window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        if let Some(record) = self.store.find_recent_search(search_term, since).await? {
            tracing::debug!(search_id = %record.search_id, "search cache hit");
            return Ok(CachedSearch { record, outcome: CacheOutcome::Hit });
        }

        let payload = fetch(search_term.to_owned()).await.map_err(ServiceError::Provider)?;
        let record = SearchRecord::create(user_id, search_term, &payload);
        self.store.insert_search(&record).await?;
        tracing::debug!(search_id = %record.search_id, "search cache miss, stored");
        Ok(CachedSearch { record, outcome: CacheOutcome::Miss })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use search_cache_storage::StorageError;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<SearchRecord>>,
        fail_lookups: bool,
    }

    impl MemoryStore {
        fn with(rows: Vec<SearchRecord>) -> Self {
            Self { rows: Mutex::new(rows), fail_lookups: false }
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchStore for MemoryStore {
        async fn insert_search(&self, record: &SearchRecord) -> Result<(), StorageError> {
            self.rows.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn fetch_all_searches(&self) -> Result<Vec<SearchRecord>, StorageError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn find_recent_search(
            &self,
            search_term: &str,
            since: DateTime<Utc>,
        ) -> Result<Option<SearchRecord>, StorageError> {
            if self.fail_lookups {
                return Err(StorageError::from(sqlx::Error::PoolTimedOut));
            }
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.search_term == search_term && r.created_at >= since)
                .max_by_key(|r| r.created_at)
                .cloned())
        }
    }

    fn aged(term: &str, age: Duration) -> SearchRecord {
        let mut rec = SearchRecord::create("u0", term, &format!("cached {term}"));
        rec.created_at = Utc::now() - age;
        rec
    }

    #[tokio::test]
    async fn miss_fetches_and_stores() {
        let store = Arc::new(MemoryStore::default());
        let service = SearchCacheService::new(store.clone(), Duration::hours(1));

        let got = service
            .cached_search("u1", "cats", |term| async move { Ok(format!("fresh {term}")) })
            .await
            .unwrap();

        assert_eq!(got.outcome, CacheOutcome::Miss);
        assert_eq!(got.record.result, "fresh cats");
        assert_eq!(got.record.user_id, "u1");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn hit_inside_window_skips_provider() {
        let cached = aged("cats", Duration::minutes(30));
        let store = Arc::new(MemoryStore::with(vec![cached.clone()]));
        let service = SearchCacheService::new(store.clone(), Duration::hours(1));
        let calls = AtomicUsize::new(0);

        let got = service
            .cached_search("u2", "cats", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok("unused".to_owned()) }
            })
            .await
            .unwrap();

        assert_eq!(got, CachedSearch { record: cached, outcome: CacheOutcome::Hit });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let store = Arc::new(MemoryStore::with(vec![aged("cats", Duration::hours(2))]));
        let service = SearchCacheService::new(store.clone(), Duration::hours(1));

        let got = service
            .cached_search("u1", "cats", |_| async { Ok("new".to_owned()) })
            .await
            .unwrap();

        assert_eq!(got.outcome, CacheOutcome::Miss);
        assert_eq!(got.record.result, "new");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn provider_failure_stores_nothing() {
        let store = Arc::new(MemoryStore::default());
        let service = SearchCacheService::new(store.clone(), Duration::hours(1));

        let err = service
            .cached_search("u1", "cats", |_| async { Err(anyhow::anyhow!("upstream 503")) })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Provider(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn blank_term_is_rejected() {
        let service = SearchCacheService::new(Arc::new(MemoryStore::default()), Duration::hours(1));
        let err = service
            .cached_search("u1", "   ", |_| async { Ok(String::new()) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        let store = Arc::new(MemoryStore { rows: Mutex::default(), fail_lookups: true });
        let service = SearchCacheService::new(store, Duration::hours(1));
        let err = service
            .cached_search("u1", "cats", |_| async { Ok(String::new()) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(err.is_transient());
    }
}
