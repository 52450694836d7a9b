use async_trait::async_trait;

use crate::domain::{
    Comment, Follow, Like, NewComment, NewFollow, NewLike, NewPost, NewUser, Post, User,
};
use crate::error::RepoError;

/// Generic repository trait: lookup, insert and delete by primary key.
///
/// `insert` checks every constraint of the table before the row becomes
/// visible. `delete` cascades to dependent rows.
#[async_trait]
pub trait BaseRepository<T, N>: Send + Sync {
    /// Find an entity by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError>;

    /// Insert a new entity, returning it with its assigned id.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Delete an entity by its id.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

/// User repository with lookups on the unique columns.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost> {
    /// Posts owned by a user, oldest first.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, NewComment> {
    /// Comments on a post in insertion order.
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Comment>, RepoError>;
}

#[async_trait]
pub trait LikeRepository: BaseRepository<Like, NewLike> {
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Like>, RepoError>;

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Like>, RepoError>;

    async fn find_by_user_and_post(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<Option<Like>, RepoError>;

    /// Number of likes on a post, without loading the rows.
    async fn count_by_post_id(&self, post_id: i64) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait FollowRepository: BaseRepository<Follow, NewFollow> {
    /// Edges in which the user is the one being followed.
    async fn find_followers(&self, user_id: i64) -> Result<Vec<Follow>, RepoError>;

    /// Edges in which the user is the follower.
    async fn find_following(&self, user_id: i64) -> Result<Vec<Follow>, RepoError>;
}

/// Store handle threaded through every data-access call.
///
/// There is no global store. Each repository call acquires its own lock or
/// pooled connection and releases it before returning.
pub trait Store: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn posts(&self) -> &dyn PostRepository;

    fn comments(&self) -> &dyn CommentRepository;

    fn likes(&self) -> &dyn LikeRepository;

    fn follows(&self) -> &dyn FollowRepository;
}
