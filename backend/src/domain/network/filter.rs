//! Read-side predicates and ordering for node listings.
//!
//! Inbound adapters parse query strings into a [`NodeListQuery`]; the
//! in-memory store evaluates it with [`NodeListQuery::page`] and the
//! PostgreSQL adapter translates the same fields into SQL.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::{NetworkNode, NodeLevel};
use crate::domain::validation::{FieldViolation, ViolationKind};

/// Structured node predicates. All present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    /// Case-insensitive substring of the contact country.
    pub country: Option<String>,
    /// Case-insensitive substring of the contact city.
    pub city: Option<String>,
    /// Exact level.
    pub level: Option<NodeLevel>,
    /// Inclusive lower bound on the UTC creation date.
    pub created_after: Option<NaiveDate>,
    /// Inclusive upper bound on the UTC creation date.
    pub created_before: Option<NaiveDate>,
    /// Case-insensitive substring of node name, contact city, or country.
    pub search: Option<String>,
}

impl NodeFilter {
    /// Whether `node` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, node: &NetworkNode) -> bool {
        let created = node.created_at.date_naive();
        self.country
            .as_deref()
            .is_none_or(|term| contains_folded(&node.contact.country, term))
            && self
                .city
                .as_deref()
                .is_none_or(|term| contains_folded(&node.contact.city, term))
            && self.level.is_none_or(|level| node.level == level)
            && self.created_after.is_none_or(|after| created >= after)
            && self.created_before.is_none_or(|before| created <= before)
            && self.search.as_deref().is_none_or(|term| {
                contains_folded(&node.name, term)
                    || contains_folded(&node.contact.city, term)
                    || contains_folded(&node.contact.country, term)
            })
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Trim a free-text term, dropping blank values.
#[must_use]
pub fn text_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
}

/// Parse an inclusive `YYYY-MM-DD` bound.
///
/// # Errors
/// Returns an `invalid_date` violation naming `field`.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, FieldViolation> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FieldViolation::new(field, ViolationKind::InvalidDate).with_value(raw))
}

/// Sortable node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    /// Node name.
    #[default]
    Name,
    /// Derived level.
    Level,
    /// Outstanding debt.
    Debt,
    /// Creation timestamp.
    CreatedAt,
}

impl OrderField {
    const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Level => "level",
            Self::Debt => "debt",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Listing order. Ties always break on ascending id.
///
/// Names compare by their UTF-8 bytes, so `"Zeta"` sorts before `"alpha"`.
/// The PostgreSQL store orders with the `C` collation to match.
///
/// # Examples
/// ```
/// use network_backend::domain::{NodeOrdering, OrderField};
///
/// let ordering: NodeOrdering = "-debt".parse().expect("valid ordering");
/// assert_eq!(ordering.field, OrderField::Debt);
/// assert!(ordering.descending);
/// assert_eq!(ordering.to_string(), "-debt");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeOrdering {
    /// Attribute to sort by.
    pub field: OrderField,
    /// Reverse the attribute order.
    pub descending: bool,
}

impl NodeOrdering {
    /// Compare two nodes under this ordering.
    #[must_use]
    pub fn compare(&self, a: &NetworkNode, b: &NetworkNode) -> Ordering {
        let primary = match self.field {
            OrderField::Name => a.name.cmp(&b.name),
            OrderField::Level => a.level.cmp(&b.level),
            OrderField::Debt => a.debt.cmp(&b.debt),
            OrderField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let directed = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        directed.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for NodeOrdering {
    type Err = FieldViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (descending, key) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let field = match key {
            "name" => OrderField::Name,
            "level" => OrderField::Level,
            "debt" => OrderField::Debt,
            "created_at" => OrderField::CreatedAt,
            _ => {
                return Err(
                    FieldViolation::new("ordering", ViolationKind::InvalidOrdering).with_value(s),
                );
            }
        };
        Ok(Self { field, descending })
    }
}

impl fmt::Display for NodeOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.key())
    }
}

/// A filtered, ordered window of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeListQuery {
    /// Predicates.
    pub filter: NodeFilter,
    /// Sort order.
    pub ordering: NodeOrdering,
    /// Rows to skip.
    pub offset: usize,
    /// Maximum rows to return.
    pub limit: usize,
}

/// One window of a node listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePage {
    /// Nodes in order.
    pub nodes: Vec<NetworkNode>,
    /// Whether rows exist beyond this window.
    pub has_more: bool,
}

impl NodeListQuery {
    /// Apply the query to an unfiltered node set.
    #[must_use]
    pub fn page(&self, nodes: impl IntoIterator<Item = NetworkNode>) -> NodePage {
        let mut matching: Vec<NetworkNode> = nodes
            .into_iter()
            .filter(|node| self.filter.matches(node))
            .collect();
        matching.sort_by(|a, b| self.ordering.compare(a, b));
        let mut window: Vec<NetworkNode> = matching
            .into_iter()
            .skip(self.offset)
            .take(self.limit.saturating_add(1))
            .collect();
        let has_more = window.len() > self.limit;
        window.truncate(self.limit);
        NodePage {
            nodes: window,
            has_more,
        }
    }
}
