use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Like entity - at most one per (user, post) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLike {
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewLike {
    pub fn new(user_id: i64, post_id: i64) -> Self {
        Self {
            user_id,
            post_id,
            created_at: None,
        }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn into_like(self, id: i64) -> Like {
        Like {
            id,
            user_id: self.user_id,
            post_id: self.post_id,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}
