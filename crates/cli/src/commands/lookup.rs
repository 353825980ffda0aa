use anyhow::Result;
use chrono::{Duration, Utc};
use search_cache_core::{env_parse_with_default, SEARCH_CACHE_WINDOW_SECS};
use search_cache_storage::{PgStore, SearchStore};

pub(crate) async fn run(store: &PgStore, term: &str, window_secs: Option<i64>) -> Result<()> {
    let secs = window_secs.unwrap_or_else(|| {
        env_parse_with_default("SEARCH_CACHE_WINDOW_SECS", SEARCH_CACHE_WINDOW_SECS)
    });
    let window = Duration::try_seconds(secs.max(0))
        .ok_or_else(|| anyhow::anyhow!("window of {secs} seconds is out of range"))?;
    let since = Utc::now()
        .checked_sub_signed(window)
        .ok_or_else(|| anyhow::anyhow!("window of {secs} seconds is out of range"))?;

    match store.find_recent_search(term, since).await? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("No cached result for {term:?} in the last {secs}s"),
    }
    Ok(())
}
