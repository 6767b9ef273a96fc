//! Staff accounts, login credentials, and the staff access capability.
//!
//! Every network operation takes a [`StaffAccess`] token. The only way to
//! obtain one is [`StaffAccess::authorize`], which checks that the caller is
//! authenticated, active, and holds the staff or superuser flag.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Error;

/// Identifier of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(i64);

impl StaffId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A staff account as seen by authorisation checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAccount {
    /// Account identifier.
    pub id: StaffId,
    /// Login name.
    pub username: String,
    /// Disabled accounts cannot log in or act.
    pub is_active: bool,
    /// Staff members may manage the network.
    pub is_staff: bool,
    /// Superusers may do everything staff can.
    pub is_superuser: bool,
}

impl StaffAccount {
    /// Whether this account may operate on the network.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.is_active && (self.is_staff || self.is_superuser)
    }
}

/// Proof that the caller passed the staff check.
///
/// Domain services require this token for every operation. It cannot be
/// constructed outside [`StaffAccess::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffAccess {
    staff_id: StaffId,
}

impl StaffAccess {
    /// Evaluate the capability for an optional caller.
    ///
    /// Anonymous, inactive, and non-privileged callers all receive the same
    /// forbidden error.
    ///
    /// # Errors
    /// Returns [`Error::forbidden`] when the caller may not act.
    ///
    /// # Examples
    /// ```
    /// use network_backend::domain::{StaffAccess, StaffAccount, StaffId};
    ///
    /// let admin = StaffAccount {
    ///     id: StaffId::new(1),
    ///     username: "admin".into(),
    ///     is_active: true,
    ///     is_staff: true,
    ///     is_superuser: false,
    /// };
    /// let access = StaffAccess::authorize(Some(&admin)).expect("staff may act");
    /// assert_eq!(access.staff_id(), StaffId::new(1));
    /// assert!(StaffAccess::authorize(None).is_err());
    /// ```
    pub fn authorize(account: Option<&StaffAccount>) -> Result<Self, Error> {
        match account {
            Some(account) if account.is_privileged() => Ok(Self {
                staff_id: account.id,
            }),
            _ => Err(Error::forbidden(
                "you do not have permission to perform this action",
            )),
        }
    }

    /// Identifier of the authorised account.
    #[must_use]
    pub const fn staff_id(&self) -> StaffId {
        self.staff_id
    }
}

/// Access token for an active staff account with id 1.
#[cfg(test)]
pub(crate) fn test_access() -> StaffAccess {
    StaffAccess {
        staff_id: StaffId::new(1),
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller whitespace. It is zeroed on drop.
///
/// # Examples
/// ```
/// use network_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "pw").expect("valid");
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    /// Returns [`LoginValidationError`] when either part is blank.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for account lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Input for provisioning a staff account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffAccount {
    /// Login name, trimmed.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}
