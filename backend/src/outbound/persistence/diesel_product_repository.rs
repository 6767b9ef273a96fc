//! PostgreSQL-backed product repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{ListWindow, Page, Product, ProductDraft, ProductId};

use super::error_mapping::{StoreFailure, classify, pool_message};
use super::models::{NewProductRow, ProductRow};
use super::node_rows::sql_window;
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of [`ProductRepository`].
///
/// Catalogue links are removed by `ON DELETE CASCADE` on the join table.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    ProductRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => ProductRepositoryError::connection(message),
        StoreFailure::UniqueViolation { constraint }
        | StoreFailure::ForeignKeyViolation { constraint } => ProductRepositoryError::query(
            format!("constraint violated: {}", constraint.unwrap_or_default()),
        ),
        StoreFailure::Query(message) => ProductRepositoryError::query(message),
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(products::table)
            .values(&NewProductRow {
                name: draft.name.as_str(),
                model: draft.model.as_str(),
                release_date: draft.release_date,
            })
            .returning(products::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Product::from_draft(ProductId::new(id), draft))
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = products::table
            .find(id.value())
            .select(ProductRow::as_select())
            .first::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Product::from))
    }

    async fn list(&self, window: ListWindow) -> Result<Page<Product>, ProductRepositoryError> {
        let (offset, fetch) = sql_window(window.offset, window.limit);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductRow> = products::table
            .order(products::id.asc())
            .offset(offset)
            .limit(fetch)
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::from_overfetch(
            rows.into_iter().map(Product::from).collect(),
            window.limit,
        ))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(products::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let error = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(error, ProductRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("bad url"));
    }
}
