//! Error types for the example-data crate.

use thiserror::Error;

/// Structural problems in a [`crate::NetworkBlueprint`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlueprintError {
    /// A node references a contact index outside the contact table.
    #[error("node '{node}' references unknown contact #{contact}")]
    UnknownContact {
        /// Offending node name.
        node: String,
        /// Out-of-range contact index.
        contact: usize,
    },
    /// A node references a product index outside the product table.
    #[error("node '{node}' references unknown product #{product}")]
    UnknownProduct {
        /// Offending node name.
        node: String,
        /// Out-of-range product index.
        product: usize,
    },
    /// A node's supplier does not appear before it in the node list.
    #[error("node '{node}' is supplied by node #{supplier}, which is not listed earlier")]
    SupplierNotEarlier {
        /// Offending node name.
        node: String,
        /// Supplier index.
        supplier: usize,
    },
    /// A node carries a negative debt.
    #[error("node '{node}' has a negative debt")]
    NegativeDebt {
        /// Offending node name.
        node: String,
    },
}

/// Errors raised while generating the example network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A release date in the product table is not a calendar date.
    #[error("product '{product}' has an invalid release date")]
    InvalidReleaseDate {
        /// Product name.
        product: String,
    },
    /// The assembled blueprint failed structural validation.
    #[error("generated blueprint is inconsistent: {0}")]
    Blueprint(#[from] BlueprintError),
}
