//! Network node services.
//!
//! [`NetworkService`] implements both node driving ports on top of a
//! [`NetworkNodeRepository`]. It stamps creation times, forces zero opening
//! debt on every API-created node, and maps repository failures onto the
//! domain error taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    NetworkCommand, NetworkNodeRepository, NetworkNodeRepositoryError, NetworkQuery,
};
use crate::domain::{
    Debt, DebtInfo, Error, HierarchyError, NetworkNode, NewNetworkNode, NodeDraft, NodeId,
    NodeLevel, NodeListQuery, NodePage, NodePatch, StaffAccess,
};

fn not_found_reference(field: &str, message: String, id: i64) -> Error {
    Error::not_found(message).with_details(json!({
        "field": field,
        "code": "not_found",
        "value": id,
    }))
}

fn map_hierarchy_error(violation: HierarchyError) -> Error {
    if let Some(field) = violation.violation() {
        return field.into();
    }
    match violation {
        HierarchyError::UnknownNode { id } => not_found_reference(
            "supplier_id",
            format!("supplier node {id} not found"),
            id.value(),
        ),
        other => Error::internal(format!("network hierarchy error: {other}")),
    }
}

fn map_node_error(error: NetworkNodeRepositoryError) -> Error {
    match error {
        NetworkNodeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("network store unavailable: {message}"))
        }
        NetworkNodeRepositoryError::Query { message } => {
            Error::internal(format!("network store error: {message}"))
        }
        NetworkNodeRepositoryError::NodeNotFound { id } => {
            Error::not_found(format!("network node {id} not found"))
        }
        NetworkNodeRepositoryError::ContactNotFound { id } => {
            not_found_reference("contact_id", format!("contact {id} not found"), id.value())
        }
        NetworkNodeRepositoryError::ProductNotFound { id } => {
            not_found_reference("products_ids", format!("product {id} not found"), id.value())
        }
        NetworkNodeRepositoryError::Hierarchy { violation } => map_hierarchy_error(violation),
    }
}

/// Node service implementing [`NetworkCommand`] and [`NetworkQuery`].
#[derive(Clone)]
pub struct NetworkService<R> {
    nodes: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> NetworkService<R> {
    /// Create a service over a node repository.
    pub fn new(nodes: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { nodes, clock }
    }
}

impl<R> NetworkService<R>
where
    R: NetworkNodeRepository,
{
    async fn load(&self, id: NodeId) -> Result<NetworkNode, Error> {
        self.nodes
            .find(id)
            .await
            .map_err(map_node_error)?
            .ok_or_else(|| Error::not_found(format!("network node {id} not found")))
    }

    async fn apply(
        &self,
        access: &StaffAccess,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<NetworkNode, Error> {
        let update = self
            .nodes
            .update(id, patch.normalised())
            .await
            .map_err(map_node_error)?;
        info!(
            staff_id = %access.staff_id(),
            node_id = %id,
            level = update.node.level.value(),
            relevelled = update.level_changes.len(),
            "network node updated"
        );
        Ok(update.node)
    }
}

#[async_trait]
impl<R> NetworkCommand for NetworkService<R>
where
    R: NetworkNodeRepository,
{
    async fn create_node(
        &self,
        access: &StaffAccess,
        draft: NodeDraft,
    ) -> Result<NetworkNode, Error> {
        let node = self
            .nodes
            .create(NewNetworkNode {
                draft,
                debt: Debt::ZERO,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_node_error)?;
        info!(
            staff_id = %access.staff_id(),
            node_id = %node.id,
            level = node.level.value(),
            "network node created"
        );
        Ok(node)
    }

    async fn replace_node(
        &self,
        access: &StaffAccess,
        id: NodeId,
        draft: NodeDraft,
    ) -> Result<NetworkNode, Error> {
        self.apply(access, id, NodePatch::from(draft)).await
    }

    async fn patch_node(
        &self,
        access: &StaffAccess,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<NetworkNode, Error> {
        if patch.is_empty() {
            return self.load(id).await;
        }
        self.apply(access, id, patch).await
    }

    async fn delete_node(&self, access: &StaffAccess, id: NodeId) -> Result<(), Error> {
        let detachment = self
            .nodes
            .delete(id)
            .await
            .map_err(map_node_error)?
            .ok_or_else(|| Error::not_found(format!("network node {id} not found")))?;
        info!(
            staff_id = %access.staff_id(),
            node_id = %id,
            detached = detachment.detached.len(),
            relevelled = detachment.relevelled.len(),
            "network node deleted"
        );
        Ok(())
    }

    async fn clear_debt(&self, access: &StaffAccess, ids: Vec<NodeId>) -> Result<u64, Error> {
        let mut unique = ids;
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            return Ok(0);
        }
        let requested = unique.len();
        let cleared = self
            .nodes
            .clear_debt(unique)
            .await
            .map_err(map_node_error)?;
        info!(
            staff_id = %access.staff_id(),
            requested,
            cleared,
            "network debt cleared"
        );
        Ok(cleared)
    }
}

#[async_trait]
impl<R> NetworkQuery for NetworkService<R>
where
    R: NetworkNodeRepository,
{
    async fn list_nodes(
        &self,
        _access: &StaffAccess,
        query: NodeListQuery,
    ) -> Result<NodePage, Error> {
        self.nodes.list(query).await.map_err(map_node_error)
    }

    async fn get_node(&self, _access: &StaffAccess, id: NodeId) -> Result<NetworkNode, Error> {
        self.load(id).await
    }

    async fn nodes_at_level(
        &self,
        _access: &StaffAccess,
        level: NodeLevel,
    ) -> Result<Vec<NetworkNode>, Error> {
        self.nodes
            .list_by_level(level)
            .await
            .map_err(map_node_error)
    }

    async fn debt_info(&self, _access: &StaffAccess, id: NodeId) -> Result<DebtInfo, Error> {
        self.load(id).await.map(|node| node.debt_info())
    }
}

#[cfg(test)]
#[path = "network_service_tests.rs"]
mod tests;
