//! Serialization engine - turns a root entity into a nested [`View`].
//!
//! Expansion is fixed per entity type. Posts and comments expand "upward" to
//! the user who made them; nothing expands a downward collection more than
//! one level, so traversal always terminates without a visited set.
//!
//! Each nested entity costs one store lookup: a post with N comments issues
//! N author lookups. Those lookups run concurrently but the comment order in
//! the output is the order the store returned.

use futures::future::try_join_all;
use pixgram_shared::{CommentView, FollowView, LikeView, PostView, UserView, View};

use crate::domain::{Comment, Entity, EntityKind, Follow, Like, Post, User};
use crate::error::DomainError;
use crate::ports::Store;
use crate::relations::{author_of, comments_of, find_entity, likes_count_of, owner_of};

/// Leaf form of a user. Posts, comments and likes are never expanded.
pub fn serialize_user(user: &User) -> UserView {
    UserView {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        profile_picture: user.profile_picture.clone(),
        bio: user.bio.clone(),
        created_at: user.created_at,
    }
}

pub fn serialize_like(like: &Like) -> LikeView {
    LikeView {
        id: like.id,
        user_id: like.user_id,
        post_id: like.post_id,
        created_at: like.created_at,
    }
}

pub fn serialize_follow(follow: &Follow) -> FollowView {
    FollowView {
        id: follow.id,
        follower_id: follow.follower_id,
        followed_id: follow.followed_id,
        created_at: follow.created_at,
    }
}

/// A comment with its author embedded. The parent post is not embedded.
pub async fn serialize_comment(
    store: &dyn Store,
    comment: &Comment,
) -> Result<CommentView, DomainError> {
    let author = author_of(store, comment).await?;

    Ok(CommentView {
        id: comment.id,
        user_id: comment.user_id,
        post_id: comment.post_id,
        content: comment.content.clone(),
        created_at: comment.created_at,
        user: serialize_user(&author),
    })
}

/// A post with its owner, its comments and the like count.
pub async fn serialize_post(store: &dyn Store, post: &Post) -> Result<PostView, DomainError> {
    let owner = owner_of(store, post).await?;
    let comments = comments_of(store, post).await?;
    let comments = try_join_all(comments.iter().map(|c| serialize_comment(store, c))).await?;
    let likes_count = likes_count_of(store, post).await?;

    tracing::debug!(
        post_id = post.id,
        comments = comments.len(),
        likes_count,
        "Serialized post"
    );

    Ok(PostView {
        id: post.id,
        user_id: post.user_id,
        image_url: post.image_url.clone(),
        caption: post.caption.clone(),
        created_at: post.created_at,
        user: serialize_user(&owner),
        comments,
        likes_count,
    })
}

/// Serialize any root entity according to its expansion policy.
pub async fn serialize(store: &dyn Store, root: &Entity) -> Result<View, DomainError> {
    let view = match root {
        Entity::User(user) => View::User(serialize_user(user)),
        Entity::Post(post) => View::Post(serialize_post(store, post).await?),
        Entity::Comment(comment) => View::Comment(serialize_comment(store, comment).await?),
        Entity::Like(like) => View::Like(serialize_like(like)),
        Entity::Follow(follow) => View::Follow(serialize_follow(follow)),
    };
    Ok(view)
}

/// Load the root by id, then serialize it.
pub async fn serialize_by_id(
    store: &dyn Store,
    kind: EntityKind,
    id: i64,
) -> Result<View, DomainError> {
    let root = find_entity(store, kind, id)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: kind,
            id,
        })?;
    serialize(store, &root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_user_leaf_form_copies_profile_fields() {
        let user = User {
            id: 7,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            profile_picture: Some("ana.png".to_string()),
            bio: Some("hi".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };

        let view = serialize_user(&user);
        assert_eq!(view.id, 7);
        assert_eq!(view.username, "ana");
        assert_eq!(view.profile_picture.as_deref(), Some("ana.png"));
        assert_eq!(view.created_at, user.created_at);
    }

    #[test]
    fn test_follow_has_no_expansion() {
        let follow = Follow {
            id: 1,
            follower_id: 2,
            followed_id: 3,
            created_at: Utc::now(),
        };
        let view = serialize_follow(&follow);
        assert_eq!((view.follower_id, view.followed_id), (2, 3));
    }
}
