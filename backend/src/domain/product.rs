//! Products stocked by network nodes.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{FieldViolation, bounded_text};

/// Identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
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

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const NAME_MAX: usize = 255;
const MODEL_MAX: usize = 100;

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Marketing name.
    pub name: String,
    /// Model code.
    pub model: String,
    /// Market release date.
    pub release_date: NaiveDate,
}

impl ProductDraft {
    /// Validate raw product fields.
    ///
    /// # Errors
    /// Returns a violation for `name` or `model`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use network_backend::domain::ProductDraft;
    ///
    /// let date = NaiveDate::from_ymd_opt(2023, 9, 15).expect("date");
    /// let draft = ProductDraft::try_new("Sony Xperia 5 V", "XQ-DE72", date).expect("valid");
    /// assert_eq!(draft.model, "XQ-DE72");
    /// ```
    pub fn try_new(name: &str, model: &str, release_date: NaiveDate) -> Result<Self, FieldViolation> {
        Ok(Self {
            name: bounded_text("name", name, NAME_MAX)?,
            model: bounded_text("model", model, MODEL_MAX)?,
            release_date,
        })
    }
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Identifier.
    pub id: ProductId,
    /// Marketing name.
    pub name: String,
    /// Model code.
    pub model: String,
    /// Market release date.
    pub release_date: NaiveDate,
}

impl Product {
    /// Combine a draft with its assigned identifier.
    #[must_use]
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            model: draft.model,
            release_date: draft.release_date,
        }
    }
}
