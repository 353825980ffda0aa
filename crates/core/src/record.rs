use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp;

/// One search query and the result payload returned for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRecord {
    pub search_id: String,
    /// Owning user; must exist in `users`.
    pub user_id: String,
    pub search_term: String,
    pub result: String,
    #[serde(with = "timestamp::serde_format")]
    pub created_at: DateTime<Utc>,
}

impl SearchRecord {
    #[must_use]
    pub fn new(
        search_id: String,
        user_id: String,
        search_term: String,
        result: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { search_id, user_id, search_term, result, created_at }
    }

    /// Fresh record with a random id, stamped now.
    #[must_use]
    pub fn create(user_id: &str, search_term: &str, result: &str) -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            user_id.to_owned(),
            search_term.to_owned(),
            result.to_owned(),
            Utc::now(),
        )
    }
}

/// A user and when it was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(with = "timestamp::serde_format")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    #[must_use]
    pub fn new(user_id: String, created_at: DateTime<Utc>) -> Self {
        Self { user_id, created_at }
    }

    #[must_use]
    pub fn create() -> Self {
        Self::new(Uuid::new_v4().to_string(), Utc::now())
    }
}
