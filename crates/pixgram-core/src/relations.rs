//! Relationship graph - typed, directed edges between stored entities.
//!
//! Every lookup goes to the store at call time; nothing is cached between
//! calls. To-one edges whose target row is missing fail with
//! [`DomainError::ReferentialIntegrity`] instead of yielding nothing.

use std::fmt;

use crate::domain::{Comment, Entity, EntityKind, Follow, Like, Post, User};
use crate::error::DomainError;
use crate::ports::{BaseRepository, Store};

/// Named edges of the graph.
///
/// | From    | Relations                                      |
/// |---------|------------------------------------------------|
/// | User    | Posts, Comments, Likes, Following, Followers   |
/// | Post    | Owner, Comments, Likes                         |
/// | Comment | Author, Post                                   |
/// | Like    | User, Post                                     |
/// | Follow  | Follower, Followed                             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Posts,
    Comments,
    Likes,
    Following,
    Followers,
    Owner,
    Author,
    Post,
    User,
    Follower,
    Followed,
}

impl Relation {
    pub fn name(self) -> &'static str {
        match self {
            Relation::Posts => "posts",
            Relation::Comments => "comments",
            Relation::Likes => "likes",
            Relation::Following => "following",
            Relation::Followers => "followers",
            Relation::Owner => "owner",
            Relation::Author => "author",
            Relation::Post => "post",
            Relation::User => "user",
            Relation::Follower => "follower",
            Relation::Followed => "followed",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of following one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related {
    One(Entity),
    Many(Vec<Entity>),
}

impl Related {
    pub fn into_one(self) -> Option<Entity> {
        match self {
            Related::One(entity) => Some(entity),
            Related::Many(_) => None,
        }
    }

    pub fn into_many(self) -> Option<Vec<Entity>> {
        match self {
            Related::One(_) => None,
            Related::Many(entities) => Some(entities),
        }
    }
}

fn many<T: Into<Entity>>(items: Vec<T>) -> Related {
    Related::Many(items.into_iter().map(Into::into).collect())
}

/// Follow `relation` from `entity`.
pub async fn related(
    store: &dyn Store,
    entity: &Entity,
    relation: Relation,
) -> Result<Related, DomainError> {
    tracing::trace!(kind = %entity.kind(), id = entity.id(), %relation, "Following relation");

    let related = match (entity, relation) {
        (Entity::User(user), Relation::Posts) => many(posts_of(store, user).await?),
        (Entity::User(user), Relation::Comments) => {
            many(store.comments().find_by_user_id(user.id).await?)
        }
        (Entity::User(user), Relation::Likes) => {
            many(store.likes().find_by_user_id(user.id).await?)
        }
        (Entity::User(user), Relation::Following) => many(following_of(store, user).await?),
        (Entity::User(user), Relation::Followers) => many(followers_of(store, user).await?),

        (Entity::Post(post), Relation::Owner) => Related::One(owner_of(store, post).await?.into()),
        (Entity::Post(post), Relation::Comments) => many(comments_of(store, post).await?),
        (Entity::Post(post), Relation::Likes) => many(likes_of(store, post).await?),

        (Entity::Comment(comment), Relation::Author) => {
            Related::One(author_of(store, comment).await?.into())
        }
        (Entity::Comment(comment), Relation::Post) => {
            Related::One(post_of_comment(store, comment).await?.into())
        }

        (Entity::Like(like), Relation::User) => Related::One(liker_of(store, like).await?.into()),
        (Entity::Like(like), Relation::Post) => {
            Related::One(post_of_like(store, like).await?.into())
        }

        (Entity::Follow(follow), Relation::Follower) => {
            Related::One(follower_of(store, follow).await?.into())
        }
        (Entity::Follow(follow), Relation::Followed) => {
            Related::One(followed_of(store, follow).await?.into())
        }

        (entity, relation) => {
            return Err(DomainError::InvalidRelation {
                kind: entity.kind(),
                relation: relation.name(),
            });
        }
    };

    Ok(related)
}

async fn load_user(store: &dyn Store, id: i64, referenced_by: String) -> Result<User, DomainError> {
    store
        .users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::dangling(EntityKind::User, id, referenced_by))
}

async fn load_post(store: &dyn Store, id: i64, referenced_by: String) -> Result<Post, DomainError> {
    store
        .posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::dangling(EntityKind::Post, id, referenced_by))
}

/// The user who owns `post`.
pub async fn owner_of(store: &dyn Store, post: &Post) -> Result<User, DomainError> {
    load_user(store, post.user_id, format!("post {}", post.id)).await
}

/// The user who wrote `comment`.
pub async fn author_of(store: &dyn Store, comment: &Comment) -> Result<User, DomainError> {
    load_user(store, comment.user_id, format!("comment {}", comment.id)).await
}

pub async fn post_of_comment(store: &dyn Store, comment: &Comment) -> Result<Post, DomainError> {
    load_post(store, comment.post_id, format!("comment {}", comment.id)).await
}

pub async fn liker_of(store: &dyn Store, like: &Like) -> Result<User, DomainError> {
    load_user(store, like.user_id, format!("like {}", like.id)).await
}

pub async fn post_of_like(store: &dyn Store, like: &Like) -> Result<Post, DomainError> {
    load_post(store, like.post_id, format!("like {}", like.id)).await
}

pub async fn follower_of(store: &dyn Store, follow: &Follow) -> Result<User, DomainError> {
    load_user(store, follow.follower_id, format!("follow {}", follow.id)).await
}

pub async fn followed_of(store: &dyn Store, follow: &Follow) -> Result<User, DomainError> {
    load_user(store, follow.followed_id, format!("follow {}", follow.id)).await
}

pub async fn posts_of(store: &dyn Store, user: &User) -> Result<Vec<Post>, DomainError> {
    Ok(store.posts().find_by_user_id(user.id).await?)
}

/// Comments on `post`, in the order they were inserted.
pub async fn comments_of(store: &dyn Store, post: &Post) -> Result<Vec<Comment>, DomainError> {
    Ok(store.comments().find_by_post_id(post.id).await?)
}

pub async fn likes_of(store: &dyn Store, post: &Post) -> Result<Vec<Like>, DomainError> {
    Ok(store.likes().find_by_post_id(post.id).await?)
}

pub async fn likes_count_of(store: &dyn Store, post: &Post) -> Result<u64, DomainError> {
    Ok(store.likes().count_by_post_id(post.id).await?)
}

/// Users following `user`.
pub async fn followers_of(store: &dyn Store, user: &User) -> Result<Vec<User>, DomainError> {
    let edges = store.follows().find_followers(user.id).await?;
    let mut users = Vec::with_capacity(edges.len());
    for edge in &edges {
        users.push(follower_of(store, edge).await?);
    }
    Ok(users)
}

/// Users that `user` follows.
pub async fn following_of(store: &dyn Store, user: &User) -> Result<Vec<User>, DomainError> {
    let edges = store.follows().find_following(user.id).await?;
    let mut users = Vec::with_capacity(edges.len());
    for edge in &edges {
        users.push(followed_of(store, edge).await?);
    }
    Ok(users)
}

/// Load any entity by kind and id.
pub async fn find_entity(
    store: &dyn Store,
    kind: EntityKind,
    id: i64,
) -> Result<Option<Entity>, DomainError> {
    let entity = match kind {
        EntityKind::User => store.users().find_by_id(id).await?.map(Entity::User),
        EntityKind::Post => store.posts().find_by_id(id).await?.map(Entity::Post),
        EntityKind::Comment => store.comments().find_by_id(id).await?.map(Entity::Comment),
        EntityKind::Like => store.likes().find_by_id(id).await?.map(Entity::Like),
        EntityKind::Follow => store.follows().find_by_id(id).await?.map(Entity::Follow),
    };
    Ok(entity)
}
