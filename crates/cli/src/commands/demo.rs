//! Sample run: one user, one search through the cache, then both listings.

use std::sync::Arc;

use anyhow::Result;
use search_cache_core::UserRecord;
use search_cache_service::SearchCacheService;
use search_cache_storage::{PgStore, SearchStore, UserStore};

const SAMPLE_TERM: &str = "how to work at macdonalds";
const SAMPLE_RESULT: &str = "Dummy Search Results";

pub(crate) async fn run(store: PgStore) -> Result<()> {
    let store = Arc::new(store);
    let user = UserRecord::create();
    store.insert_user(&user).await?;

    let cache = SearchCacheService::from_env(Arc::clone(&store));
    let cached = cache
        .cached_search(&user.user_id, SAMPLE_TERM, |_| async { Ok(SAMPLE_RESULT.to_owned()) })
        .await?;
    tracing::info!(outcome = ?cached.outcome, search_id = %cached.record.search_id, "demo search");

    let searches = store.fetch_all_searches().await?;
    println!("fetch_all_searches: {}", serde_json::to_string_pretty(&searches)?);
    let users = store.fetch_all_users().await?;
    println!("fetch_all_users: {}", serde_json::to_string_pretty(&users)?);
    Ok(())
}
