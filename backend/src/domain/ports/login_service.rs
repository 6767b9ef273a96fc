//! Driving port for staff authentication.
//!
//! Inbound adapters call this port to check credentials at login and to
//! resolve the account behind a session on every protected request.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, StaffAccount, StaffId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the active account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffAccount, Error>;

    /// Look up the account behind a session.
    async fn resolve(&self, id: StaffId) -> Result<Option<StaffAccount>, Error>;
}
