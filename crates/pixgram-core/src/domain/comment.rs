use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - text written by a user on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewComment {
    pub fn new(user_id: i64, post_id: i64, content: impl Into<String>) -> Self {
        Self {
            user_id,
            post_id,
            content: content.into(),
            created_at: None,
        }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn into_comment(self, id: i64) -> Comment {
        Comment {
            id,
            user_id: self.user_id,
            post_id: self.post_id,
            content: self.content,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}
