//! Contact records owned by network nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{FieldViolation, ViolationKind, bounded_text};

/// Identifier of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
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

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const EMAIL_MAX: usize = 254;
const PLACE_MAX: usize = 100;
const HOUSE_NUMBER_MAX: usize = 20;

/// A syntactically valid email address.
///
/// ## Invariants
/// - Trimmed, at most 254 characters, no whitespace.
/// - Exactly one `@` with a non-empty local part and a dotted domain whose
///   labels are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an address.
    ///
    /// # Errors
    /// Returns a violation for the `email` field.
    ///
    /// # Examples
    /// ```
    /// use network_backend::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::parse("info@dns-shop.ru").is_ok());
    /// assert!(EmailAddress::parse("dns-shop.ru").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, FieldViolation> {
        let value = bounded_text("email", raw, EMAIL_MAX)?;
        if !is_email_shaped(&value) {
            return Err(FieldViolation::new("email", ViolationKind::InvalidEmail).with_value(value));
        }
        Ok(Self(value))
    }

    /// Address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Validated input for creating a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    /// Unique address.
    pub email: EmailAddress,
    /// Country name.
    pub country: String,
    /// City name.
    pub city: String,
    /// Street name.
    pub street: String,
    /// House number, free text (for example `5-10-15`).
    pub house_number: String,
}

impl ContactDraft {
    /// Validate raw contact fields.
    ///
    /// # Errors
    /// Returns the first violation found, in field order.
    pub fn try_new(
        email: &str,
        country: &str,
        city: &str,
        street: &str,
        house_number: &str,
    ) -> Result<Self, FieldViolation> {
        Ok(Self {
            email: EmailAddress::parse(email)?,
            country: bounded_text("country", country, PLACE_MAX)?,
            city: bounded_text("city", city, PLACE_MAX)?,
            street: bounded_text("street", street, PLACE_MAX)?,
            house_number: bounded_text("house_number", house_number, HOUSE_NUMBER_MAX)?,
        })
    }
}

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Identifier.
    pub id: ContactId,
    /// Unique address.
    pub email: String,
    /// Country name.
    pub country: String,
    /// City name.
    pub city: String,
    /// Street name.
    pub street: String,
    /// House number.
    pub house_number: String,
}

impl Contact {
    /// Combine a draft with its assigned identifier.
    #[must_use]
    pub fn from_draft(id: ContactId, draft: ContactDraft) -> Self {
        Self {
            id,
            email: draft.email.0,
            country: draft.country,
            city: draft.city,
            street: draft.street,
            house_number: draft.house_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("factory@sony.jp")]
    #[case("ip.sidorov@gmail.com")]
    #[case("  shop@technodom.kz  ")]
    fn accepts_addresses(#[case] raw: &str) {
        let email = EmailAddress::parse(raw).expect("valid");
        assert_eq!(email.as_str(), raw.trim());
    }

    #[rstest]
    #[case("plain", ViolationKind::InvalidEmail)]
    #[case("@sony.jp", ViolationKind::InvalidEmail)]
    #[case("a@b", ViolationKind::InvalidEmail)]
    #[case("a@b..jp", ViolationKind::InvalidEmail)]
    #[case("a b@c.jp", ViolationKind::InvalidEmail)]
    #[case("a@b@c.jp", ViolationKind::InvalidEmail)]
    #[case("  ", ViolationKind::Blank)]
    fn rejects_addresses(#[case] raw: &str, #[case] kind: ViolationKind) {
        let err = EmailAddress::parse(raw).expect_err("invalid");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.field(), "email");
    }

    #[rstest]
    fn draft_reports_offending_field() {
        let err = ContactDraft::try_new("a@b.ru", "Россия", "Москва", "Тверская", "")
            .expect_err("house number required");
        assert_eq!(err.field(), "house_number");
    }

    #[rstest]
    fn draft_trims_fields() {
        let draft = ContactDraft::try_new(" a@b.ru ", " Россия ", "Москва", "Тверская", " 1 ")
            .expect("valid");
        let contact = Contact::from_draft(ContactId::new(3), draft);
        assert_eq!(contact.email, "a@b.ru");
        assert_eq!(contact.country, "Россия");
        assert_eq!(contact.house_number, "1");
    }
}
