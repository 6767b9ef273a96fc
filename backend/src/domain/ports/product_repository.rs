//! Port for product persistence.

use async_trait::async_trait;

use crate::domain::{ListWindow, Page, Product, ProductDraft, ProductId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
    }
}

/// Port for storing products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product.
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductRepositoryError>;

    /// Fetch a product by id.
    async fn find(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// List products ascending by id.
    async fn list(&self, window: ListWindow) -> Result<Page<Product>, ProductRepositoryError>;

    /// Delete a product and drop it from every node catalogue.
    ///
    /// Returns `false` when the product does not exist.
    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError>;
}
