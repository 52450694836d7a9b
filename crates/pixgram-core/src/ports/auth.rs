//! Password credential port.

/// Password hashing service. Users are stored with the hash, never the plain text.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Credential errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
