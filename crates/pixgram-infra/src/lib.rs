//! # Pixgram Infrastructure
//!
//! Concrete implementations of the ports defined in `pixgram-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL store via SeaORM
//! - `auth` - Argon2 password hashing

pub mod database;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports
pub use database::DatabaseConfig;
pub use store::{InMemoryStore, open_store};

#[cfg(feature = "postgres")]
pub use database::PostgresStore;

#[cfg(feature = "auth")]
pub use auth::Argon2PasswordService;
