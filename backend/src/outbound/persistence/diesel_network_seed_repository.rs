//! PostgreSQL-backed network seeding adapter.
//!
//! The whole seed is written in one transaction. `Replace` clears contacts,
//! products, and nodes first; `IfEmpty` leaves a populated store alone.
//! Staff accounts are never touched.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    NetworkSeedRepository, NetworkSeedRepositoryError, NetworkSeedRequest, SeedMode, SeedNode,
    SeedOutcome,
};

use super::error_mapping::{StoreFailure, TxError, classify, pool_message};
use super::models::{NewContactRow, NewNodeRow, NewProductRow, NodeProductRow};
use super::node_rows::level_column;
use super::pool::{DbPool, PoolError};
use super::schema::{contacts, network_node_products, network_nodes, products};

type SeedTx = TxError<NetworkSeedRepositoryError>;

/// Diesel-backed implementation of [`NetworkSeedRepository`].
#[derive(Clone)]
pub struct DieselNetworkSeedRepository {
    pool: DbPool,
}

impl DieselNetworkSeedRepository {
    /// Create a seeding repository over a connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use network_backend::outbound::persistence::{
    ///     DbPool, DieselNetworkSeedRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/network")).await?;
    /// let repository = DieselNetworkSeedRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NetworkSeedRepositoryError {
    NetworkSeedRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> NetworkSeedRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => NetworkSeedRepositoryError::connection(message),
        StoreFailure::UniqueViolation { constraint } => NetworkSeedRepositoryError::invalid_reference(
            format!("duplicate value for {}", constraint.unwrap_or_default()),
        ),
        StoreFailure::ForeignKeyViolation { constraint } => {
            NetworkSeedRepositoryError::invalid_reference(format!(
                "dangling reference through {}",
                constraint.unwrap_or_default()
            ))
        }
        StoreFailure::Query(message) => NetworkSeedRepositoryError::query(message),
    }
}

fn unknown(seed: &SeedNode, what: &str, index: usize) -> SeedTx {
    TxError::Rejected(NetworkSeedRepositoryError::invalid_reference(format!(
        "node '{}' references unknown {what} #{index}",
        seed.name.as_str()
    )))
}

async fn holds_network(conn: &mut AsyncPgConnection) -> QueryResult<bool> {
    let any_contact: bool = diesel::select(exists(contacts::table.select(contacts::id)))
        .get_result(conn)
        .await?;
    let any_product: bool = diesel::select(exists(products::table.select(products::id)))
        .get_result(conn)
        .await?;
    Ok(any_contact || any_product)
}

async fn clear_network(conn: &mut AsyncPgConnection) -> QueryResult<()> {
    diesel::delete(network_node_products::table)
        .execute(conn)
        .await?;
    diesel::delete(network_nodes::table).execute(conn).await?;
    diesel::delete(contacts::table).execute(conn).await?;
    diesel::delete(products::table).execute(conn).await?;
    Ok(())
}

async fn insert_nodes(
    conn: &mut AsyncPgConnection,
    request: &NetworkSeedRequest,
    contact_ids: &[i64],
    product_ids: &[i64],
) -> Result<usize, SeedTx> {
    let mut node_ids: Vec<i64> = Vec::with_capacity(request.nodes.len());
    let mut links: Vec<NodeProductRow> = Vec::new();
    for seed in &request.nodes {
        let contact_id = *contact_ids
            .get(seed.contact)
            .ok_or_else(|| unknown(seed, "contact", seed.contact))?;
        let supplier_id = match seed.supplier {
            Some(index) => Some(
                *node_ids
                    .get(index)
                    .ok_or_else(|| unknown(seed, "supplier", index))?,
            ),
            None => None,
        };
        let id: i64 = diesel::insert_into(network_nodes::table)
            .values(&NewNodeRow {
                name: seed.name.as_str(),
                contact_id,
                supplier_id,
                debt: seed.debt.amount(),
                level: level_column(seed.level)?,
                created_at: request.created_at,
            })
            .returning(network_nodes::id)
            .get_result(conn)
            .await?;
        for &index in &seed.products {
            let product_id = *product_ids
                .get(index)
                .ok_or_else(|| unknown(seed, "product", index))?;
            links.push(NodeProductRow {
                node_id: id,
                product_id,
            });
        }
        node_ids.push(id);
    }
    if !links.is_empty() {
        diesel::insert_into(network_node_products::table)
            .values(&links)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(node_ids.len())
}

#[async_trait]
impl NetworkSeedRepository for DieselNetworkSeedRepository {
    async fn seed_network(
        &self,
        request: NetworkSeedRequest,
    ) -> Result<SeedOutcome, NetworkSeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                match request.mode {
                    SeedMode::IfEmpty => {
                        if holds_network(conn).await? {
                            debug!("network already populated, skipping seed");
                            return Ok(SeedOutcome::SkippedNonEmpty);
                        }
                    }
                    SeedMode::Replace => clear_network(conn).await?,
                }

                let contact_rows: Vec<NewContactRow<'_>> = request
                    .contacts
                    .iter()
                    .map(|draft| NewContactRow {
                        email: draft.email.as_str(),
                        country: draft.country.as_str(),
                        city: draft.city.as_str(),
                        street: draft.street.as_str(),
                        house_number: draft.house_number.as_str(),
                    })
                    .collect();
                let contact_ids: Vec<i64> = if contact_rows.is_empty() {
                    Vec::new()
                } else {
                    diesel::insert_into(contacts::table)
                        .values(&contact_rows)
                        .returning(contacts::id)
                        .get_results(conn)
                        .await?
                };

                let product_rows: Vec<NewProductRow<'_>> = request
                    .products
                    .iter()
                    .map(|draft| NewProductRow {
                        name: draft.name.as_str(),
                        model: draft.model.as_str(),
                        release_date: draft.release_date,
                    })
                    .collect();
                let product_ids: Vec<i64> = if product_rows.is_empty() {
                    Vec::new()
                } else {
                    diesel::insert_into(products::table)
                        .values(&product_rows)
                        .returning(products::id)
                        .get_results(conn)
                        .await?
                };

                let nodes = insert_nodes(conn, &request, &contact_ids, &product_ids).await?;
                Ok(SeedOutcome::Applied {
                    contacts: contact_ids.len(),
                    products: product_ids.len(),
                    nodes,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: SeedTx| err.resolve(map_diesel_error))
    }
}
