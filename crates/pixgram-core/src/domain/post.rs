use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - an image published by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert form of a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i64,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn new(user_id: i64, image_url: impl Into<String>) -> Self {
        Self {
            user_id,
            image_url: image_url.into(),
            caption: None,
            created_at: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn into_post(self, id: i64) -> Post {
        Post {
            id,
            user_id: self.user_id,
            image_url: self.image_url,
            caption: self.caption,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}
