//! # Pixgram Shared
//!
//! View shapes handed to clients.
//! In a full-stack Rust setup, this crate is compiled for both server and WASM.

pub mod view;

pub use view::{CommentView, FollowView, LikeView, PostView, UserView, View};
