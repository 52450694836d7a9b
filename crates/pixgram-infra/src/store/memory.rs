//! In-memory store - used when no database is configured, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pixgram_core::domain::{
    Comment, EntityKind, Follow, Like, NewComment, NewFollow, NewLike, NewPost, NewUser, Post,
    User, Validate,
};
use pixgram_core::error::RepoError;
use pixgram_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, LikeRepository, PostRepository, Store,
    UserRepository,
};

use super::mask_email;

#[derive(Default)]
struct Sequences {
    user: i64,
    post: i64,
    comment: i64,
    like: i64,
    follow: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

/// Rows keyed by id, so iteration order is insertion order.
#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    likes: BTreeMap<i64, Like>,
    follows: BTreeMap<i64, Follow>,
    seq: Sequences,
}

impl Tables {
    fn require_user(&self, id: i64, column: &str) -> Result<(), RepoError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::ReferentialIntegrity(format!(
                "{column} references missing user {id}"
            )))
        }
    }

    fn require_post(&self, id: i64, column: &str) -> Result<(), RepoError> {
        if self.posts.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::ReferentialIntegrity(format!(
                "{column} references missing post {id}"
            )))
        }
    }

    /// Remove a post together with its comments and likes.
    fn remove_post(&mut self, id: i64) -> Option<Post> {
        let post = self.posts.remove(&id)?;
        self.comments.retain(|_, c| c.post_id != id);
        self.likes.retain(|_, l| l.post_id != id);
        Some(post)
    }

    /// Remove a user and everything that references it.
    fn remove_user(&mut self, id: i64) -> Option<User> {
        let user = self.users.remove(&id)?;
        let owned: Vec<i64> = self
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            self.remove_post(post_id);
        }
        self.comments.retain(|_, c| c.user_id != id);
        self.likes.retain(|_, l| l.user_id != id);
        self.follows
            .retain(|_, f| f.follower_id != id && f.followed_id != id);
        Some(user)
    }
}

/// In-memory store using ordered maps behind a single async RwLock.
///
/// Constraint checks and the write happen under one write guard, so a
/// rejected insert leaves nothing behind.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn posts(&self) -> &dyn PostRepository {
        self
    }

    fn comments(&self) -> &dyn CommentRepository {
        self
    }

    fn likes(&self) -> &dyn LikeRepository {
        self
    }

    fn follows(&self) -> &dyn FollowRepository {
        self
    }
}

#[async_trait]
impl BaseRepository<User, NewUser> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        new.validate()?;

        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(RepoError::ConstraintViolation(format!(
                "username '{}' already exists",
                new.username
            )));
        }
        if tables.users.values().any(|u| u.email == new.email) {
            return Err(RepoError::ConstraintViolation(
                "email already exists".to_string(),
            ));
        }

        let id = next_id(&mut tables.seq.user);
        let user = new.into_user(id);
        tracing::debug!(user_id = id, user_email = %mask_email(&user.email), "Inserted user");
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.remove_user(id).ok_or(RepoError::NotFound {
            entity: EntityKind::User,
            id,
        })?;
        tracing::info!(user_id = id, "Deleted user and dependent rows");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        new.validate()?;

        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id, "post.user_id")?;

        let id = next_id(&mut tables.seq.post);
        let post = new.into_post(id);
        tracing::debug!(post_id = id, user_id = post.user_id, "Inserted post");
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.remove_post(id).ok_or(RepoError::NotFound {
            entity: EntityKind::Post,
            id,
        })?;
        tracing::info!(post_id = id, "Deleted post with its comments and likes");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Comment, NewComment> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        new.validate()?;

        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id, "comment.user_id")?;
        tables.require_post(new.post_id, "comment.post_id")?;

        let id = next_id(&mut tables.seq.comment);
        let comment = new.into_comment(id);
        tracing::debug!(comment_id = id, post_id = comment.post_id, "Inserted comment");
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound {
            entity: EntityKind::Comment,
            id,
        })?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Like, NewLike> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Like>, RepoError> {
        Ok(self.tables.read().await.likes.get(&id).cloned())
    }

    async fn insert(&self, new: NewLike) -> Result<Like, RepoError> {
        new.validate()?;
        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id, "like.user_id")?;
        tables.require_post(new.post_id, "like.post_id")?;
        if tables
            .likes
            .values()
            .any(|l| l.user_id == new.user_id && l.post_id == new.post_id)
        {
            return Err(RepoError::ConstraintViolation(format!(
                "user {} already likes post {}",
                new.user_id, new.post_id
            )));
        }

        let id = next_id(&mut tables.seq.like);
        let like = new.into_like(id);
        tracing::debug!(like_id = id, post_id = like.post_id, "Inserted like");
        tables.likes.insert(id, like.clone());
        Ok(like)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.likes.remove(&id).ok_or(RepoError::NotFound {
            entity: EntityKind::Like,
            id,
        })?;
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Like>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Like>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_post(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<Option<Like>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn count_by_post_id(&self, post_id: i64) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.values().filter(|l| l.post_id == post_id).count() as u64)
    }
}

#[async_trait]
impl BaseRepository<Follow, NewFollow> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Follow>, RepoError> {
        Ok(self.tables.read().await.follows.get(&id).cloned())
    }

    async fn insert(&self, new: NewFollow) -> Result<Follow, RepoError> {
        new.validate()?;

        let mut tables = self.tables.write().await;
        tables.require_user(new.follower_id, "follow.follower_id")?;
        tables.require_user(new.followed_id, "follow.followed_id")?;
        if tables
            .follows
            .values()
            .any(|f| f.follower_id == new.follower_id && f.followed_id == new.followed_id)
        {
            return Err(RepoError::ConstraintViolation(format!(
                "user {} already follows user {}",
                new.follower_id, new.followed_id
            )));
        }

        let id = next_id(&mut tables.seq.follow);
        let follow = new.into_follow(id);
        tracing::debug!(
            follow_id = id,
            follower_id = follow.follower_id,
            followed_id = follow.followed_id,
            "Inserted follow"
        );
        tables.follows.insert(id, follow.clone());
        Ok(follow)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.follows.remove(&id).ok_or(RepoError::NotFound {
            entity: EntityKind::Follow,
            id,
        })?;
        Ok(())
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn find_followers(&self, user_id: i64) -> Result<Vec<Follow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .filter(|f| f.followed_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_following(&self, user_id: i64) -> Result<Vec<Follow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .filter(|f| f.follower_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, User, Post) {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .insert(NewUser::new("ana", "ana@example.com", "hash"))
            .await
            .unwrap();
        let post = store
            .posts()
            .insert(NewPost::new(user.id, "img.jpg"))
            .await
            .unwrap();
        (store, user, post)
    }

    #[tokio::test]
    async fn test_ids_increase_per_table() {
        let (store, user, post) = seeded().await;
        let bob = store
            .users()
            .insert(NewUser::new("bob", "bob@example.com", "hash"))
            .await
            .unwrap();
        assert_eq!((user.id, bob.id), (1, 2));
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (store, _, _) = seeded().await;
        let err = store
            .users()
            .insert(NewUser::new("ana", "other@example.com", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _, _) = seeded().await;
        let err = store
            .users()
            .insert(NewUser::new("ana2", "ana@example.com", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert!(store.users().find_by_username("ana2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_password_rejected() {
        let store = InMemoryStore::new();
        let err = store
            .users()
            .insert(NewUser::new("ana", "ana@example.com", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_blank_required_text_rejected() {
        let (store, user, post) = seeded().await;

        let err = store
            .users()
            .insert(NewUser::new("   ", "blank@example.com", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));

        let err = store
            .users()
            .insert(NewUser::new("blank", " ", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));

        let err = store
            .users()
            .insert(NewUser::new("blank", "blank@example.com", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));

        let err = store
            .posts()
            .insert(NewPost::new(user.id, "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));

        let err = store
            .comments()
            .insert(NewComment::new(user.id, post.id, "\t"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));

        assert!(store.users().find_by_username("blank").await.unwrap().is_none());
        assert_eq!(store.posts().find_by_user_id(user.id).await.unwrap().len(), 1);
        assert!(store.comments().find_by_post_id(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_like_requires_existing_user_and_post() {
        let (store, user, post) = seeded().await;

        let err = store
            .likes()
            .insert(NewLike::new(77, post.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ReferentialIntegrity(_)));

        let err = store
            .likes()
            .insert(NewLike::new(user.id, 77))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ReferentialIntegrity(_)));
        assert_eq!(store.likes().count_by_post_id(post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_follow_requires_existing_users() {
        let (store, user, _) = seeded().await;

        let err = store
            .follows()
            .insert(NewFollow::new(77, user.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ReferentialIntegrity(_)));

        let err = store
            .follows()
            .insert(NewFollow::new(user.id, 77))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ReferentialIntegrity(_)));
        assert!(store.follows().find_following(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_requires_existing_owner() {
        let store = InMemoryStore::new();
        let err = store
            .posts()
            .insert(NewPost::new(42, "img.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ReferentialIntegrity(_)));
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let (store, user, _) = seeded().await;
        let err = store
            .comments()
            .insert(NewComment::new(user.id, 99, "nice"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ReferentialIntegrity(_)));
    }

    #[tokio::test]
    async fn test_second_like_on_same_post_rejected() {
        let (store, user, post) = seeded().await;
        store.likes().insert(NewLike::new(user.id, post.id)).await.unwrap();
        let err = store
            .likes()
            .insert(NewLike::new(user.id, post.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert_eq!(store.likes().count_by_post_id(post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_self_follow_rejected() {
        let (store, user, _) = seeded().await;
        let err = store
            .follows()
            .insert(NewFollow::new(user.id, user.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_follow_roles_are_independent() {
        let (store, ana, _) = seeded().await;
        let bob = store
            .users()
            .insert(NewUser::new("bob", "bob@example.com", "hash"))
            .await
            .unwrap();
        store.follows().insert(NewFollow::new(ana.id, bob.id)).await.unwrap();

        let bob_followers = store.follows().find_followers(bob.id).await.unwrap();
        assert_eq!(bob_followers.len(), 1);
        assert_eq!(bob_followers[0].follower_id, ana.id);
        assert!(store.follows().find_following(bob.id).await.unwrap().is_empty());
        assert!(store.follows().find_followers(ana.id).await.unwrap().is_empty());

        let err = store
            .follows()
            .insert(NewFollow::new(ana.id, bob.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let (store, ana, post) = seeded().await;
        let bob = store
            .users()
            .insert(NewUser::new("bob", "bob@example.com", "hash"))
            .await
            .unwrap();
        let bob_post = store
            .posts()
            .insert(NewPost::new(bob.id, "bob.jpg"))
            .await
            .unwrap();
        store
            .comments()
            .insert(NewComment::new(bob.id, post.id, "from bob"))
            .await
            .unwrap();
        store
            .comments()
            .insert(NewComment::new(ana.id, bob_post.id, "from ana"))
            .await
            .unwrap();
        store.likes().insert(NewLike::new(ana.id, bob_post.id)).await.unwrap();
        store.follows().insert(NewFollow::new(bob.id, ana.id)).await.unwrap();

        store.users().delete(ana.id).await.unwrap();

        assert!(store.posts().find_by_id(post.id).await.unwrap().is_none());
        assert!(store.comments().find_by_post_id(post.id).await.unwrap().is_empty());
        assert!(store.comments().find_by_user_id(ana.id).await.unwrap().is_empty());
        assert_eq!(store.likes().count_by_post_id(bob_post.id).await.unwrap(), 0);
        assert!(store.follows().find_following(bob.id).await.unwrap().is_empty());
        assert!(store.posts().find_by_id(bob_post.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deleting_post_cascades_to_comments_and_likes() {
        let (store, user, post) = seeded().await;
        let comment = store
            .comments()
            .insert(NewComment::new(user.id, post.id, "nice"))
            .await
            .unwrap();
        store.likes().insert(NewLike::new(user.id, post.id)).await.unwrap();

        store.posts().delete(post.id).await.unwrap();

        assert!(store.comments().find_by_id(comment.id).await.unwrap().is_none());
        assert!(store.likes().find_by_user_id(user.id).await.unwrap().is_empty());
        assert!(store.users().find_by_id(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.posts().delete(5).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::NotFound {
                entity: EntityKind::Post,
                id: 5
            }
        ));
    }
}
