//! Driving port for product management.

use async_trait::async_trait;

use crate::domain::{Error, ListWindow, Page, Product, ProductDraft, ProductId, StaffAccess};

/// Product operations available to staff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// List products ascending by id.
    async fn list_products(
        &self,
        access: &StaffAccess,
        window: ListWindow,
    ) -> Result<Page<Product>, Error>;

    /// Create a product.
    async fn create_product(
        &self,
        access: &StaffAccess,
        draft: ProductDraft,
    ) -> Result<Product, Error>;

    /// One product.
    async fn get_product(&self, access: &StaffAccess, id: ProductId) -> Result<Product, Error>;

    /// Delete a product and drop it from every catalogue.
    async fn delete_product(&self, access: &StaffAccess, id: ProductId) -> Result<(), Error>;
}
