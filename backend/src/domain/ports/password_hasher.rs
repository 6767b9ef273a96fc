//! Port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes new passwords and verifies candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a PHC-formatted hash for `password`.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
