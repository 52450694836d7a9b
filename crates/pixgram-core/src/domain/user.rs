use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - an account that owns posts, comments, likes and follow edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert form of a [`User`]. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    /// Defaults to the insert time when unset.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            profile_picture: None,
            bio: None,
            created_at: None,
        }
    }

    pub fn with_profile_picture(mut self, picture: impl Into<String>) -> Self {
        self.profile_picture = Some(picture.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Materialize the record once the store has picked an id.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            profile_picture: self.profile_picture,
            bio: self.bio,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}
