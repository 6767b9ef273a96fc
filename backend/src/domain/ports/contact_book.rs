//! Driving port for contact management.

use async_trait::async_trait;

use crate::domain::{Contact, ContactDraft, ContactId, Error, ListWindow, Page, StaffAccess};

/// Contact operations available to staff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactBook: Send + Sync {
    /// List contacts ascending by id.
    async fn list_contacts(
        &self,
        access: &StaffAccess,
        window: ListWindow,
    ) -> Result<Page<Contact>, Error>;

    /// Create a contact.
    async fn create_contact(
        &self,
        access: &StaffAccess,
        draft: ContactDraft,
    ) -> Result<Contact, Error>;

    /// One contact.
    async fn get_contact(&self, access: &StaffAccess, id: ContactId) -> Result<Contact, Error>;

    /// Delete a contact and the nodes it owns.
    async fn delete_contact(&self, access: &StaffAccess, id: ContactId) -> Result<(), Error>;
}
