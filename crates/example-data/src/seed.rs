//! Generated network seed types.
//!
//! Records reference each other by position: a node names its contact, its
//! products, and its supplier by index into the blueprint's vectors. Suppliers
//! always precede the nodes they supply, so the node list can be applied in
//! order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BlueprintError;

/// Contact details for one network participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSeed {
    /// Unique e-mail address.
    pub email: String,
    /// Country name.
    pub country: String,
    /// City name.
    pub city: String,
    /// Street name.
    pub street: String,
    /// House number, possibly with building suffixes.
    pub house_number: String,
}

/// A product that network nodes may stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeed {
    /// Marketing name.
    pub name: String,
    /// Manufacturer model code.
    pub model: String,
    /// Market release date.
    pub release_date: NaiveDate,
}

/// One node of the example network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSeed {
    /// Display name.
    pub name: String,
    /// Index into [`NetworkBlueprint::contacts`].
    pub contact: usize,
    /// Index of the supplying node in [`NetworkBlueprint::nodes`].
    pub supplier: Option<usize>,
    /// Outstanding debt owed to the supplier.
    pub debt: Decimal,
    /// Indices into [`NetworkBlueprint::products`].
    pub products: Vec<usize>,
}

/// Complete example network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBlueprint {
    /// Contacts, including a few not referenced by any node.
    pub contacts: Vec<ContactSeed>,
    /// Product catalogue.
    pub products: Vec<ProductSeed>,
    /// Nodes in supplier-first order.
    pub nodes: Vec<NodeSeed>,
}

impl NetworkBlueprint {
    /// Check that every index resolves and suppliers precede their dependents.
    ///
    /// # Errors
    ///
    /// Returns the first [`BlueprintError`] found, scanning nodes in order.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.contact >= self.contacts.len() {
                return Err(BlueprintError::UnknownContact {
                    node: node.name.clone(),
                    contact: node.contact,
                });
            }
            if let Some(&product) = node.products.iter().find(|&&p| p >= self.products.len()) {
                return Err(BlueprintError::UnknownProduct {
                    node: node.name.clone(),
                    product,
                });
            }
            if let Some(supplier) = node.supplier.filter(|&supplier| supplier >= index) {
                return Err(BlueprintError::SupplierNotEarlier {
                    node: node.name.clone(),
                    supplier,
                });
            }
            if node.debt < Decimal::ZERO {
                return Err(BlueprintError::NegativeDebt {
                    node: node.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Depth of a node in the supplier hierarchy (0 for nodes without a
    /// supplier).
    ///
    /// Returns `None` when the index is out of range or the chain does not
    /// terminate within the node count.
    #[must_use]
    pub fn depth_of(&self, index: usize) -> Option<u32> {
        let mut depth = 0_u32;
        let mut current = self.nodes.get(index)?;
        for _ in 0..self.nodes.len() {
            match current.supplier {
                None => return Some(depth),
                Some(next) => {
                    current = self.nodes.get(next)?;
                    depth = depth.saturating_add(1);
                }
            }
        }
        None
    }

    /// Indices of the nodes at the given depth, in blueprint order.
    #[must_use]
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&index| self.depth_of(index) == Some(depth))
            .collect()
    }

    /// Sum of every node's debt.
    #[must_use]
    pub fn total_debt(&self) -> Decimal {
        self.nodes.iter().map(|node| node.debt).sum()
    }
}
