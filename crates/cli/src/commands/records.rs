use anyhow::Result;
use search_cache_core::{SearchRecord, UserRecord};
use search_cache_storage::{PgStore, SearchStore, UserStore};

pub(crate) async fn add_user(store: &PgStore, user_id: Option<String>) -> Result<()> {
    let mut user = UserRecord::create();
    if let Some(id) = user_id {
        user.user_id = id;
    }
    store.insert_user(&user).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

pub(crate) async fn add_search(
    store: &PgStore,
    user_id: &str,
    term: &str,
    result: &str,
) -> Result<()> {
    let record = SearchRecord::create(user_id, term, result);
    store.insert_search(&record).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub(crate) async fn list_searches(store: &PgStore) -> Result<()> {
    let searches = store.fetch_all_searches().await?;
    println!("{}", serde_json::to_string_pretty(&searches)?);
    Ok(())
}

pub(crate) async fn list_users(store: &PgStore) -> Result<()> {
    let users = store.fetch_all_users().await?;
    println!("{}", serde_json::to_string_pretty(&users)?);
    Ok(())
}
