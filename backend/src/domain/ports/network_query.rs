//! Driving port for network reads.

use async_trait::async_trait;

use crate::domain::{
    DebtInfo, Error, NetworkNode, NodeId, NodeLevel, NodeListQuery, NodePage, StaffAccess,
};

/// Node reads available to staff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkQuery: Send + Sync {
    /// Filtered, ordered window of nodes.
    async fn list_nodes(
        &self,
        access: &StaffAccess,
        query: NodeListQuery,
    ) -> Result<NodePage, Error>;

    /// One node.
    async fn get_node(&self, access: &StaffAccess, id: NodeId) -> Result<NetworkNode, Error>;

    /// Nodes at exactly `level`, ascending by name.
    async fn nodes_at_level(
        &self,
        access: &StaffAccess,
        level: NodeLevel,
    ) -> Result<Vec<NetworkNode>, Error>;

    /// What a node owes and to whom.
    async fn debt_info(&self, access: &StaffAccess, id: NodeId) -> Result<DebtInfo, Error>;
}
