//! Domain entities - the stored records of the photo-sharing graph.

mod comment;
mod entity;
mod follow;
mod like;
mod post;
mod user;
mod validate;

pub use comment::{Comment, NewComment};
pub use entity::{Entity, EntityKind};
pub use follow::{Follow, NewFollow};
pub use like::{Like, NewLike};
pub use post::{NewPost, Post};
pub use user::{NewUser, User};
pub use validate::Validate;
