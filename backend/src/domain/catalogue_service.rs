//! Contact and product services.
//!
//! Both are thin: they authorise through the [`StaffAccess`] parameter, call
//! their repository, and translate failures into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    ContactBook, ContactRepository, ContactRepositoryError, ProductCatalog, ProductRepository,
    ProductRepositoryError,
};
use crate::domain::{
    Contact, ContactDraft, ContactId, Error, FieldViolation, ListWindow, Page, Product,
    ProductDraft, ProductId, StaffAccess, ViolationKind,
};

fn map_contact_error(error: ContactRepositoryError) -> Error {
    match error {
        ContactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("contact store unavailable: {message}"))
        }
        ContactRepositoryError::Query { message } => {
            Error::internal(format!("contact store error: {message}"))
        }
        ContactRepositoryError::DuplicateEmail { email } => {
            FieldViolation::new("email", ViolationKind::DuplicateEmail)
                .with_value(email)
                .into()
        }
    }
}

fn map_product_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product store unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product store error: {message}"))
        }
    }
}

/// Contact service implementing [`ContactBook`].
#[derive(Clone)]
pub struct ContactService<R> {
    contacts: Arc<R>,
}

impl<R> ContactService<R> {
    /// Create a service over a contact repository.
    pub fn new(contacts: Arc<R>) -> Self {
        Self { contacts }
    }
}

#[async_trait]
impl<R> ContactBook for ContactService<R>
where
    R: ContactRepository,
{
    async fn list_contacts(
        &self,
        _access: &StaffAccess,
        window: ListWindow,
    ) -> Result<Page<Contact>, Error> {
        self.contacts.list(window).await.map_err(map_contact_error)
    }

    async fn create_contact(
        &self,
        access: &StaffAccess,
        draft: ContactDraft,
    ) -> Result<Contact, Error> {
        let contact = self
            .contacts
            .create(draft)
            .await
            .map_err(map_contact_error)?;
        info!(staff_id = %access.staff_id(), contact_id = %contact.id, "contact created");
        Ok(contact)
    }

    async fn get_contact(&self, _access: &StaffAccess, id: ContactId) -> Result<Contact, Error> {
        self.contacts
            .find(id)
            .await
            .map_err(map_contact_error)?
            .ok_or_else(|| Error::not_found(format!("contact {id} not found")))
    }

    async fn delete_contact(&self, access: &StaffAccess, id: ContactId) -> Result<(), Error> {
        let removal = self
            .contacts
            .delete(id)
            .await
            .map_err(map_contact_error)?
            .ok_or_else(|| Error::not_found(format!("contact {id} not found")))?;
        info!(
            staff_id = %access.staff_id(),
            contact_id = %id,
            removed_nodes = removal.removed_nodes.len(),
            detached_nodes = removal.detached_nodes.len(),
            relevelled = removal.relevelled,
            "contact deleted"
        );
        Ok(())
    }
}

/// Product service implementing [`ProductCatalog`].
#[derive(Clone)]
pub struct ProductService<R> {
    products: Arc<R>,
}

impl<R> ProductService<R> {
    /// Create a service over a product repository.
    pub fn new(products: Arc<R>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl<R> ProductCatalog for ProductService<R>
where
    R: ProductRepository,
{
    async fn list_products(
        &self,
        _access: &StaffAccess,
        window: ListWindow,
    ) -> Result<Page<Product>, Error> {
        self.products.list(window).await.map_err(map_product_error)
    }

    async fn create_product(
        &self,
        access: &StaffAccess,
        draft: ProductDraft,
    ) -> Result<Product, Error> {
        let product = self
            .products
            .create(draft)
            .await
            .map_err(map_product_error)?;
        info!(staff_id = %access.staff_id(), product_id = %product.id, "product created");
        Ok(product)
    }

    async fn get_product(&self, _access: &StaffAccess, id: ProductId) -> Result<Product, Error> {
        self.products
            .find(id)
            .await
            .map_err(map_product_error)?
            .ok_or_else(|| Error::not_found(format!("product {id} not found")))
    }

    async fn delete_product(&self, access: &StaffAccess, id: ProductId) -> Result<(), Error> {
        if !self
            .products
            .delete(id)
            .await
            .map_err(map_product_error)?
        {
            return Err(Error::not_found(format!("product {id} not found")));
        }
        info!(staff_id = %access.staff_id(), product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{ContactRemoval, MockContactRepository, MockProductRepository};
    use crate::domain::staff::test_access;

    fn draft() -> ContactDraft {
        ContactDraft::try_new("info@dns-shop.ru", "Россия", "Владивосток", "Светланская", "45")
            .expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_field_violation() {
        let mut repo = MockContactRepository::new();
        repo.expect_create()
            .times(1)
            .return_once(|draft| Err(ContactRepositoryError::duplicate_email(draft.email.as_str())));

        let error = ContactService::new(Arc::new(repo))
            .create_contact(&test_access(), draft())
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "email", "code": "duplicate_email", "value": "info@dns-shop.ru"}))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_contact_is_not_found() {
        let mut repo = MockContactRepository::new();
        repo.expect_delete().times(1).return_once(|_| Ok(None));

        let error = ContactService::new(Arc::new(repo))
            .delete_contact(&test_access(), ContactId::new(8))
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_contact_reports_cascade() {
        let mut repo = MockContactRepository::new();
        repo.expect_delete()
            .withf(|id| *id == ContactId::new(1))
            .times(1)
            .return_once(|_| Ok(Some(ContactRemoval::default())));

        ContactService::new(Arc::new(repo))
            .delete_contact(&test_access(), ContactId::new(1))
            .await
            .expect("deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn product_connection_errors_are_unavailable() {
        let mut repo = MockProductRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(|_| Err(ProductRepositoryError::connection("pool timed out")));

        let error = ProductService::new(Arc::new(repo))
            .get_product(&test_access(), ProductId::new(1))
            .await
            .expect_err("unavailable");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn product_create_returns_stored_row() {
        let release = NaiveDate::from_ymd_opt(2023, 7, 28).expect("date");
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .times(1)
            .return_once(|draft| Ok(Product::from_draft(ProductId::new(11), draft)));

        let product = ProductService::new(Arc::new(repo))
            .create_product(
                &test_access(),
                ProductDraft::try_new("Sony Xperia 1 V", "XQ-DQ72", release).expect("draft"),
            )
            .await
            .expect("created");

        assert_eq!(product.id, ProductId::new(11));
        assert_eq!(product.release_date, release);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().times(1).return_once(|_| Ok(false));

        let error = ProductService::new(Arc::new(repo))
            .delete_product(&test_access(), ProductId::new(3))
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
