//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use pixgram_core::domain::{Comment, EntityKind, Follow, Like, Post, User};
use pixgram_core::error::RepoError;
use pixgram_core::ports::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, Store, UserRepository,
};

use super::DatabaseConfig;
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use crate::store::mask_email;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

pub type PostgresLikeRepository = PostgresBaseRepository<LikeEntity>;

pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_asc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(like::Column::PostId.eq(post_id))
            .order_by_asc(like::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .order_by_asc(like::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_and_post(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<Option<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count_by_post_id(&self, post_id: i64) -> Result<u64, RepoError> {
        LikeEntity::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn find_followers(&self, user_id: i64) -> Result<Vec<Follow>, RepoError> {
        let result = FollowEntity::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .order_by_asc(follow::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_following(&self, user_id: i64) -> Result<Vec<Follow>, RepoError> {
        let result = FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_asc(follow::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL-backed [`Store`]. All repositories share one connection pool.
pub struct PostgresStore {
    users: PostgresUserRepository,
    posts: PostgresPostRepository,
    comments: PostgresCommentRepository,
    likes: PostgresLikeRepository,
    follows: PostgresFollowRepository,
}

impl PostgresStore {
    pub fn new(db: DbConn) -> Self {
        let db = Arc::new(db);
        Self {
            users: PostgresBaseRepository::new(Arc::clone(&db), EntityKind::User),
            posts: PostgresBaseRepository::new(Arc::clone(&db), EntityKind::Post),
            comments: PostgresBaseRepository::new(Arc::clone(&db), EntityKind::Comment),
            likes: PostgresBaseRepository::new(Arc::clone(&db), EntityKind::Like),
            follows: PostgresBaseRepository::new(db, EntityKind::Follow),
        }
    }

    /// Connect using the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        Ok(Self::new(config.connect().await?))
    }
}

impl Store for PostgresStore {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn posts(&self) -> &dyn PostRepository {
        &self.posts
    }

    fn comments(&self) -> &dyn CommentRepository {
        &self.comments
    }

    fn likes(&self) -> &dyn LikeRepository {
        &self.likes
    }

    fn follows(&self) -> &dyn FollowRepository {
        &self.follows
    }
}
