//! Argon2id password hashing producing PHC strings.

use argon2::Argon2;
use argon2::password_hash::{
    Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use uuid::Uuid;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// [`PasswordHasher`] backed by Argon2id with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| PasswordHashError::malformed(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}
