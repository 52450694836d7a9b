//! Nested view objects produced by the serialization engine.
//!
//! Each view is bounded: an embedded [`UserView`] has no collections at all,
//! and a [`CommentView`] never carries its parent post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Leaf form of a user. Never expands posts, comments or likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A post with its owner, its comments and the number of likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub user_id: i64,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: UserView,
    pub comments: Vec<CommentView>,
    pub likes_count: u64,
}

/// A comment with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: UserView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeView {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowView {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Any serialized root entity.
///
/// Serialized untagged, so a `View::Post` renders exactly like a [`PostView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum View {
    User(UserView),
    Post(PostView),
    Comment(CommentView),
    Like(LikeView),
    Follow(FollowView),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ana() -> UserView {
        UserView {
            id: 1,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            profile_picture: None,
            bio: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_user_view_has_no_collections() {
        let json = serde_json::to_value(ana()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 6, "unexpected user view fields: {:?}", keys);
        assert!(json.get("posts").is_none());
    }

    #[test]
    fn test_timestamps_render_as_rfc3339() {
        let json = serde_json::to_value(ana()).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_untagged_view_matches_inner_shape() {
        let like = LikeView {
            id: 3,
            user_id: 1,
            post_id: 2,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(View::Like(like.clone())).unwrap(),
            serde_json::to_value(like).unwrap()
        );
    }
}
