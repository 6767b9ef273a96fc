//! Port for contact persistence.

use async_trait::async_trait;

use crate::domain::{Contact, ContactDraft, ContactId, ListWindow, NodeId, Page};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "contact repository query failed: {message}",
        /// Another contact already uses the address.
        DuplicateEmail { email: String } => "a contact with email {email} already exists",
    }
}

/// What deleting a contact removed from the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRemoval {
    /// Nodes owned by the contact, now deleted.
    pub removed_nodes: Vec<NodeId>,
    /// Surviving nodes that lost their supplier and became roots.
    pub detached_nodes: Vec<NodeId>,
    /// Number of surviving nodes whose level moved.
    pub relevelled: usize,
}

/// Port for storing contacts.
///
/// Deleting a contact deletes the nodes it owns. Their surviving dependents
/// are detached and re-levelled in the same transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a contact. Emails are unique.
    async fn create(&self, draft: ContactDraft) -> Result<Contact, ContactRepositoryError>;

    /// Fetch a contact by id.
    async fn find(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError>;

    /// List contacts ascending by id.
    async fn list(&self, window: ListWindow) -> Result<Page<Contact>, ContactRepositoryError>;

    /// Delete a contact and cascade to its nodes. `None` when absent.
    async fn delete(&self, id: ContactId)
    -> Result<Option<ContactRemoval>, ContactRepositoryError>;
}
