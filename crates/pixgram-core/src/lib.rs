//! # Pixgram Core
//!
//! The domain layer of Pixgram: accounts, posts, comments, likes and follows,
//! the store ports they are persisted through, and the engine that turns a
//! stored entity into a nested client view.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod relations;
pub mod serialize;

pub use error::{DomainError, RepoError};
pub use relations::{Related, Relation, related};
pub use serialize::{serialize, serialize_by_id};
