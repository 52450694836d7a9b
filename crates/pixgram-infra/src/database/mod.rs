//! Database configuration and the PostgreSQL store.

mod config;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use config::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCommentRepository, PostgresFollowRepository, PostgresLikeRepository,
    PostgresPostRepository, PostgresStore, PostgresUserRepository,
};
