//! Insert-time checks shared by every store.

use crate::error::RepoError;

use super::{NewComment, NewFollow, NewLike, NewPost, NewUser};

/// Column-level rules an insert form must satisfy before any write.
///
/// Foreign keys and uniqueness need the stored rows and stay with the store.
pub trait Validate {
    fn validate(&self) -> Result<(), RepoError>;
}

/// Blank strings stand in for NULL on required text columns.
fn require_text(value: &str, column: &str) -> Result<(), RepoError> {
    if value.trim().is_empty() {
        return Err(RepoError::ConstraintViolation(format!(
            "{column} must not be empty"
        )));
    }
    Ok(())
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), RepoError> {
        require_text(&self.username, "user.username")?;
        require_text(&self.email, "user.email")?;
        require_text(&self.password_hash, "user.password")
    }
}

impl Validate for NewPost {
    fn validate(&self) -> Result<(), RepoError> {
        require_text(&self.image_url, "post.image_url")
    }
}

impl Validate for NewComment {
    fn validate(&self) -> Result<(), RepoError> {
        require_text(&self.content, "comment.content")
    }
}

impl Validate for NewLike {
    fn validate(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

impl Validate for NewFollow {
    fn validate(&self) -> Result<(), RepoError> {
        if self.is_self_follow() {
            return Err(RepoError::ConstraintViolation(format!(
                "user {} cannot follow itself",
                self.follower_id
            )));
        }
        Ok(())
    }
}
