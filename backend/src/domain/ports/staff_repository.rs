//! Port for staff account persistence.

use async_trait::async_trait;

use crate::domain::{NewStaffAccount, StaffAccount, StaffId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by staff repository adapters.
    pub enum StaffRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "staff repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "staff repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "staff account {username} already exists",
    }
}

/// A staff account together with its stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCredentialRecord {
    /// Account flags and identity.
    pub account: StaffAccount,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

/// Port for looking up and provisioning staff accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Fetch an account and its hash by username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StaffCredentialRecord>, StaffRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: StaffId) -> Result<Option<StaffAccount>, StaffRepositoryError>;

    /// Insert an active account.
    async fn create(&self, account: NewStaffAccount) -> Result<StaffAccount, StaffRepositoryError>;
}
