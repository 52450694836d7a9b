use std::fmt;

use super::{Comment, Follow, Like, Post, User};

/// The five stored record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Post,
    Comment,
    Like,
    Follow,
}

impl EntityKind {
    /// Name of the backing table.
    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
            EntityKind::Like => "like",
            EntityKind::Follow => "follow",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Any stored record, used as a traversal root or relationship target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    User(User),
    Post(Post),
    Comment(Comment),
    Like(Like),
    Follow(Follow),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::User(_) => EntityKind::User,
            Entity::Post(_) => EntityKind::Post,
            Entity::Comment(_) => EntityKind::Comment,
            Entity::Like(_) => EntityKind::Like,
            Entity::Follow(_) => EntityKind::Follow,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Entity::User(u) => u.id,
            Entity::Post(p) => p.id,
            Entity::Comment(c) => c.id,
            Entity::Like(l) => l.id,
            Entity::Follow(f) => f.id,
        }
    }
}

impl From<User> for Entity {
    fn from(user: User) -> Self {
        Entity::User(user)
    }
}

impl From<Post> for Entity {
    fn from(post: Post) -> Self {
        Entity::Post(post)
    }
}

impl From<Comment> for Entity {
    fn from(comment: Comment) -> Self {
        Entity::Comment(comment)
    }
}

impl From<Like> for Entity {
    fn from(like: Like) -> Self {
        Entity::Like(like)
    }
}

impl From<Follow> for Entity {
    fn from(follow: Follow) -> Self {
        Entity::Follow(follow)
    }
}
