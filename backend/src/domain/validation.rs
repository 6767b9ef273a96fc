//! Field-level validation failures shared by domain constructors.
//!
//! A [`FieldViolation`] names the offending field and a stable code. It
//! converts into an [`Error`] with `details: { field, code, value? }`.

use std::fmt;

use serde_json::{Map, Value};

use super::Error;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required value was blank after trimming.
    Blank,
    /// Text exceeded its character limit.
    TooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// Value is not a `local@domain.tld` address.
    InvalidEmail,
    /// Another contact already uses the address.
    DuplicateEmail,
    /// Monetary value below zero.
    Negative,
    /// Monetary value with more than two fractional digits.
    TooPrecise,
    /// Monetary value outside the stored precision.
    TooLarge,
    /// A node named itself as its supplier.
    SelfSupply,
    /// The supplier change would close a loop in the chain.
    CyclicSupplierChain,
    /// Level filter is not a non-negative integer.
    InvalidLevel,
    /// Date is not `YYYY-MM-DD`.
    InvalidDate,
    /// Ordering key is not recognised.
    InvalidOrdering,
    /// Pagination cursor could not be decoded.
    InvalidCursor,
    /// Required field was absent.
    MissingField,
}

impl ViolationKind {
    /// Stable wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::TooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::DuplicateEmail => "duplicate_email",
            Self::Negative => "negative",
            Self::TooPrecise => "too_precise",
            Self::TooLarge => "too_large",
            Self::SelfSupply => "self_supply",
            Self::CyclicSupplierChain => "cyclic_supplier_chain",
            Self::InvalidLevel => "invalid_level",
            Self::InvalidDate => "invalid_date",
            Self::InvalidOrdering => "invalid_ordering",
            Self::InvalidCursor => "invalid_cursor",
            Self::MissingField => "missing_field",
        }
    }
}

/// A rejected field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub struct FieldViolation {
    field: &'static str,
    kind: ViolationKind,
    value: Option<String>,
}

impl FieldViolation {
    /// Record a violation without echoing the value.
    #[must_use]
    pub const fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self {
            field,
            kind,
            value: None,
        }
    }

    /// Echo the rejected value in the error details.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Field name as it appears on the wire.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> String {
        let field = self.field;
        match self.kind {
            ViolationKind::Blank => format!("{field} must not be blank"),
            ViolationKind::TooLong { max } => {
                format!("{field} must be at most {max} characters")
            }
            ViolationKind::InvalidEmail => format!("{field} must be a valid email address"),
            ViolationKind::DuplicateEmail => format!("a contact with this {field} already exists"),
            ViolationKind::Negative => format!("{field} must not be negative"),
            ViolationKind::TooPrecise => format!("{field} allows at most 2 decimal places"),
            ViolationKind::TooLarge => format!("{field} must be below 100000000"),
            ViolationKind::SelfSupply => "a node cannot be its own supplier".to_owned(),
            ViolationKind::CyclicSupplierChain => {
                "the supplier change would create a cycle in the supply chain".to_owned()
            }
            ViolationKind::InvalidLevel => format!("{field} must be a non-negative integer"),
            ViolationKind::InvalidDate => format!("{field} must be a date in YYYY-MM-DD format"),
            ViolationKind::InvalidOrdering => {
                format!("{field} must be one of name, level, debt, created_at (optionally prefixed with -)")
            }
            ViolationKind::InvalidCursor => format!("{field} is not a valid cursor"),
            ViolationKind::MissingField => format!("missing required field: {field}"),
        }
    }
}

impl From<FieldViolation> for Error {
    fn from(violation: FieldViolation) -> Self {
        let mut details = Map::new();
        details.insert("field".to_owned(), Value::from(violation.field));
        details.insert("code".to_owned(), Value::from(violation.kind.code()));
        if let Some(value) = &violation.value {
            details.insert("value".to_owned(), Value::from(value.as_str()));
        }
        Self::invalid_request(violation.message()).with_details(Value::Object(details))
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Trim `raw` and enforce a non-blank value of at most `max` characters.
///
/// # Errors
/// Returns [`ViolationKind::Blank`] or [`ViolationKind::TooLong`].
///
/// # Examples
/// ```
/// use network_backend::domain::{ViolationKind, bounded_text};
///
/// assert_eq!(bounded_text("city", "  Москва ", 100).as_deref(), Ok("Москва"));
/// let err = bounded_text("city", "   ", 100).expect_err("blank");
/// assert_eq!(err.kind(), ViolationKind::Blank);
/// ```
pub fn bounded_text(field: &'static str, raw: &str, max: usize) -> Result<String, FieldViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, ViolationKind::Blank));
    }
    if trimmed.chars().count() > max {
        return Err(FieldViolation::new(field, ViolationKind::TooLong { max }));
    }
    Ok(trimmed.to_owned())
}
