//! Port for loading an example network in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ContactDraft, Debt, NodeLevel, NodeName, ProductDraft};

use super::define_port_error;

define_port_error! {
    /// Errors raised by network seed repository adapters.
    pub enum NetworkSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "network seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "network seeding query failed: {message}",
        /// A seed row references a contact, product, or node that is not in
        /// the request.
        InvalidReference { message: String } => "network seed is inconsistent: {message}",
    }
}

/// How to treat existing network data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Delete contacts, products, and nodes first.
    Replace,
    /// Leave the store alone when it already holds nodes.
    IfEmpty,
}

/// One node of a seed, referencing other rows by request index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedNode {
    /// Node name.
    pub name: NodeName,
    /// Index into [`NetworkSeedRequest::contacts`].
    pub contact: usize,
    /// Index of an earlier entry in [`NetworkSeedRequest::nodes`].
    pub supplier: Option<usize>,
    /// Indexes into [`NetworkSeedRequest::products`].
    pub products: Vec<usize>,
    /// Opening debt.
    pub debt: Debt,
    /// Level derived from the supplier chain.
    pub level: NodeLevel,
}

/// Everything to insert for one seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSeedRequest {
    /// Existing-data policy.
    pub mode: SeedMode,
    /// Contacts to insert.
    pub contacts: Vec<ContactDraft>,
    /// Products to insert.
    pub products: Vec<ProductDraft>,
    /// Nodes in supplier-first order.
    pub nodes: Vec<SeedNode>,
    /// Creation time stamped on every node.
    pub created_at: DateTime<Utc>,
}

/// Result of a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Rows were written.
    Applied {
        /// Contacts inserted.
        contacts: usize,
        /// Products inserted.
        products: usize,
        /// Nodes inserted.
        nodes: usize,
    },
    /// The store already held nodes and the mode was [`SeedMode::IfEmpty`].
    SkippedNonEmpty,
}

/// Port for applying a seed atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkSeedRepository: Send + Sync {
    /// Insert the seed, or skip it, in one transaction.
    async fn seed_network(
        &self,
        request: NetworkSeedRequest,
    ) -> Result<SeedOutcome, NetworkSeedRepositoryError>;
}
