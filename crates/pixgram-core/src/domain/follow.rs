use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Follow edge - `follower_id` follows `followed_id`. Both point at users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFollow {
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewFollow {
    pub fn new(follower_id: i64, followed_id: i64) -> Self {
        Self {
            follower_id,
            followed_id,
            created_at: None,
        }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.followed_id
    }

    pub fn into_follow(self, id: i64) -> Follow {
        Follow {
            id,
            follower_id: self.follower_id,
            followed_id: self.followed_id,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}
