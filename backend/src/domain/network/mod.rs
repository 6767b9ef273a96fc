//! Network nodes and their supply hierarchy.
//!
//! A node owns one contact, stocks a set of products, and may be supplied by
//! another node. Its level is derived from the supplier chain and is never
//! written directly; debt changes only through seeding and the clear-debt
//! operation.

mod debt;
mod filter;
mod hierarchy;
mod level;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::debt::Debt;
pub use self::filter::{
    NodeFilter, NodeListQuery, NodeOrdering, NodePage, OrderField, parse_date, text_term,
};
pub use self::hierarchy::{Detachment, HierarchyError, LevelChange, SupplierLink, SupplyHierarchy};
pub use self::level::NodeLevel;

use super::contact::{Contact, ContactId};
use super::product::{Product, ProductId};
use super::validation::{FieldViolation, bounded_text};

/// Identifier of a network node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
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

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const NAME_MAX: usize = 255;

/// Trimmed node name of 1 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName(String);

impl NodeName {
    /// Validate a name.
    ///
    /// # Errors
    /// Returns a `name` violation for blank or over-long names.
    pub fn parse(raw: &str) -> Result<Self, FieldViolation> {
        bounded_text("name", raw, NAME_MAX).map(Self)
    }

    /// Name text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Unwrap the text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplier identity as shown on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRef {
    /// Supplier id.
    pub id: NodeId,
    /// Supplier name.
    pub name: String,
}

/// A node with its contact, catalogue, and supplier resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkNode {
    /// Identifier.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Owning contact.
    pub contact: Contact,
    /// Stocked products, ascending by id.
    pub products: Vec<Product>,
    /// Direct supplier.
    pub supplier: Option<SupplierRef>,
    /// Amount owed to the supplier.
    pub debt: Debt,
    /// Derived depth in the supply chain.
    pub level: NodeLevel,
    /// Creation time, fixed at insert.
    pub created_at: DateTime<Utc>,
}

impl NetworkNode {
    /// Debt summary for this node.
    #[must_use]
    pub fn debt_info(&self) -> DebtInfo {
        DebtInfo {
            node_name: self.name.clone(),
            debt: self.debt,
            supplier: self.supplier.as_ref().map(|s| s.name.clone()),
            level: self.level,
        }
    }
}

/// What a node owes and to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtInfo {
    /// Node name.
    pub node_name: String,
    /// Outstanding debt.
    pub debt: Debt,
    /// Supplier name.
    pub supplier: Option<String>,
    /// Node level.
    pub level: NodeLevel,
}

/// Writable node fields for create and full replacement.
///
/// Debt, level, and creation time are not writable here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDraft {
    /// Display name.
    pub name: NodeName,
    /// Owning contact.
    pub contact_id: ContactId,
    /// Stocked products, ascending and unique.
    pub product_ids: Vec<ProductId>,
    /// Direct supplier.
    pub supplier_id: Option<NodeId>,
}

impl NodeDraft {
    /// Assemble a draft, normalising the product list.
    #[must_use]
    pub fn new(
        name: NodeName,
        contact_id: ContactId,
        product_ids: Vec<ProductId>,
        supplier_id: Option<NodeId>,
    ) -> Self {
        Self {
            name,
            contact_id,
            product_ids: normalise_products(product_ids),
            supplier_id,
        }
    }
}

/// Partial node update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    /// New name.
    pub name: Option<NodeName>,
    /// New owning contact.
    pub contact_id: Option<ContactId>,
    /// Replacement product set.
    pub product_ids: Option<Vec<ProductId>>,
    /// New supplier; `Some(None)` detaches.
    pub supplier_id: Option<Option<NodeId>>,
}

impl NodePatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_id.is_none()
            && self.product_ids.is_none()
            && self.supplier_id.is_none()
    }

    /// Normalise the product list, if present.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.product_ids = self.product_ids.map(normalise_products);
        self
    }
}

impl From<NodeDraft> for NodePatch {
    fn from(draft: NodeDraft) -> Self {
        Self {
            name: Some(draft.name),
            contact_id: Some(draft.contact_id),
            product_ids: Some(draft.product_ids),
            supplier_id: Some(draft.supplier_id),
        }
    }
}

/// Input for inserting a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNetworkNode {
    /// Writable fields.
    pub draft: NodeDraft,
    /// Opening debt; zero outside seeding.
    pub debt: Debt,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A node after an update, with the levels that moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUpdate {
    /// Node as stored.
    pub node: NetworkNode,
    /// Level changes across the node's subtree.
    pub level_changes: Vec<LevelChange>,
}

fn normalise_products(mut ids: Vec<ProductId>) -> Vec<ProductId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
