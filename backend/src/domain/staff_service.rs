//! Staff authentication and provisioning.
//!
//! [`StaffLoginService`] implements [`LoginService`] over a
//! [`StaffRepository`] and a [`PasswordHasher`]. Unknown usernames, wrong
//! passwords, and disabled accounts all produce the same unauthorised error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, StaffRepository, StaffRepositoryError,
};
use crate::domain::{
    Error, LoginCredentials, NewStaffAccount, StaffAccount, StaffId, bounded_text,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const USERNAME_MAX: usize = 150;

fn map_staff_error(error: StaffRepositoryError) -> Error {
    match error {
        StaffRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("staff store unavailable: {message}"))
        }
        StaffRepositoryError::Query { message } => {
            Error::internal(format!("staff store error: {message}"))
        }
        StaffRepositoryError::DuplicateUsername { username } => {
            Error::conflict(format!("staff account {username} already exists"))
        }
    }
}

fn map_hash_error(error: &PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Flags for a provisioned account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffRole {
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}

impl StaffRole {
    /// Plain staff member.
    pub const STAFF: Self = Self {
        is_staff: true,
        is_superuser: false,
    };
    /// Superuser.
    pub const SUPERUSER: Self = Self {
        is_staff: true,
        is_superuser: true,
    };
}

/// Login service backed by stored staff accounts.
#[derive(Clone)]
pub struct StaffLoginService<R, H> {
    accounts: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> StaffLoginService<R, H> {
    /// Create a service over an account store and hasher.
    pub fn new(accounts: Arc<R>, hasher: Arc<H>) -> Self {
        Self { accounts, hasher }
    }
}

impl<R, H> StaffLoginService<R, H>
where
    R: StaffRepository,
    H: PasswordHasher,
{
    /// Hash a password and store a new active account.
    ///
    /// # Errors
    /// Rejects blank usernames and passwords, reports duplicate usernames as
    /// conflicts, and surfaces store failures.
    pub async fn provision(
        &self,
        username: &str,
        password: Zeroizing<String>,
        role: StaffRole,
    ) -> Result<StaffAccount, Error> {
        let username = bounded_text("username", username, USERNAME_MAX)?;
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let password_hash = self
            .hasher
            .hash(password.as_str())
            .map_err(|err| map_hash_error(&err))?;
        let account = self
            .accounts
            .create(NewStaffAccount {
                username,
                password_hash,
                is_staff: role.is_staff,
                is_superuser: role.is_superuser,
            })
            .await
            .map_err(map_staff_error)?;
        info!(
            staff_id = %account.id,
            username = %account.username,
            is_superuser = account.is_superuser,
            "staff account provisioned"
        );
        Ok(account)
    }
}

#[async_trait]
impl<R, H> LoginService for StaffLoginService<R, H>
where
    R: StaffRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffAccount, Error> {
        let Some(record) = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_staff_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .map_err(|err| {
                warn!(error = %err, staff_id = %record.account.id, "stored password hash rejected");
                map_hash_error(&err)
            })?;
        if !matches || !record.account.is_active {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(record.account)
    }

    async fn resolve(&self, id: StaffId) -> Result<Option<StaffAccount>, Error> {
        self.accounts.find_by_id(id).await.map_err(map_staff_error)
    }
}
