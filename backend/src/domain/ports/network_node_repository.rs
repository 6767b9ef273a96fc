//! Port for network node persistence.
//!
//! Adapters own the transaction boundary: every mutation loads the supplier
//! links, applies the change through [`crate::domain::SupplyHierarchy`], and
//! writes the node together with any cascaded level changes atomically.

use async_trait::async_trait;

use crate::domain::{
    ContactId, Detachment, HierarchyError, NetworkNode, NewNetworkNode, NodeId, NodeLevel,
    NodeListQuery, NodePage, NodePatch, NodeUpdate, ProductId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by network node repository adapters.
    pub enum NetworkNodeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "network node repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "network node repository query failed: {message}",
        /// The node being updated does not exist.
        NodeNotFound { id: NodeId } => "network node {id} not found",
        /// The referenced contact does not exist.
        ContactNotFound { id: ContactId } => "contact {id} not found",
        /// A referenced product does not exist.
        ProductNotFound { id: ProductId } => "product {id} not found",
        /// The supplier change breaks a hierarchy rule.
        Hierarchy { violation: HierarchyError } => "{violation}",
    }
}

impl From<HierarchyError> for NetworkNodeRepositoryError {
    fn from(violation: HierarchyError) -> Self {
        Self::Hierarchy { violation }
    }
}

/// Port for storing network nodes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkNodeRepository: Send + Sync {
    /// Insert a node, deriving its level from the supplier.
    async fn create(&self, node: NewNetworkNode) -> Result<NetworkNode, NetworkNodeRepositoryError>;

    /// Apply a patch, re-levelling the node's subtree when the supplier moves.
    async fn update(
        &self,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<NodeUpdate, NetworkNodeRepositoryError>;

    /// Delete a node, detaching its dependents. `None` when absent.
    async fn delete(&self, id: NodeId) -> Result<Option<Detachment>, NetworkNodeRepositoryError>;

    /// Fetch a node by id.
    async fn find(&self, id: NodeId) -> Result<Option<NetworkNode>, NetworkNodeRepositoryError>;

    /// Filter, order, and window the node set.
    async fn list(&self, query: NodeListQuery) -> Result<NodePage, NetworkNodeRepositoryError>;

    /// Nodes at exactly `level`, ascending by name.
    async fn list_by_level(
        &self,
        level: NodeLevel,
    ) -> Result<Vec<NetworkNode>, NetworkNodeRepositoryError>;

    /// Set the debt of every listed node to zero. Unknown ids are skipped.
    ///
    /// Returns the number of nodes updated.
    async fn clear_debt(&self, ids: Vec<NodeId>) -> Result<u64, NetworkNodeRepositoryError>;
}
