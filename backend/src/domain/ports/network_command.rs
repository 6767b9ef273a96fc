//! Driving port for network mutations.

use async_trait::async_trait;

use crate::domain::{Error, NetworkNode, NodeDraft, NodeId, NodePatch, StaffAccess};

/// Node mutations available to staff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkCommand: Send + Sync {
    /// Create a node with zero debt.
    async fn create_node(&self, access: &StaffAccess, draft: NodeDraft)
    -> Result<NetworkNode, Error>;

    /// Replace every writable field of a node.
    async fn replace_node(
        &self,
        access: &StaffAccess,
        id: NodeId,
        draft: NodeDraft,
    ) -> Result<NetworkNode, Error>;

    /// Update the supplied fields of a node.
    async fn patch_node(
        &self,
        access: &StaffAccess,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<NetworkNode, Error>;

    /// Delete a node, detaching its dependents.
    async fn delete_node(&self, access: &StaffAccess, id: NodeId) -> Result<(), Error>;

    /// Zero the debt of the listed nodes and return how many were updated.
    async fn clear_debt(&self, access: &StaffAccess, ids: Vec<NodeId>) -> Result<u64, Error>;
}
