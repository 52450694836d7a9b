//! Password credential hashing.

mod password;

pub use password::Argon2PasswordService;
