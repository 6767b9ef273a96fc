//! PostgreSQL-backed network node repository.
//!
//! Every mutation runs in one transaction: the supplier links are read into a
//! [`SupplyHierarchy`], the change is checked and applied there, and the node
//! row plus every recomputed level are written before commit.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use diesel::dsl::{exists, sql};
use diesel::expression::SqlLiteral;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{NetworkNodeRepository, NetworkNodeRepositoryError};
use crate::domain::{
    ContactId, Debt, Detachment, NetworkNode, NewNetworkNode, NodeId, NodeLevel, NodeListQuery,
    NodePage, NodePatch, NodeUpdate, OrderField, ProductId, SupplyHierarchy,
};

use super::error_mapping::{StoreFailure, TxError, classify, contains_pattern, pool_message};
use super::models::{NewNodeRow, NodeChangeset, NodeRow};
use super::node_rows::{
    find_node, hydrate, level_column, load_links, replace_products, sql_window, write_levels,
};
use super::pool::{DbPool, PoolError};
use super::schema::{contacts, network_nodes, products};

type NodeTx = TxError<NetworkNodeRepositoryError>;

/// Diesel-backed implementation of [`NetworkNodeRepository`].
#[derive(Clone)]
pub struct DieselNetworkNodeRepository {
    pool: DbPool,
}

impl DieselNetworkNodeRepository {
    /// Create a repository over a connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use network_backend::outbound::persistence::{
    ///     DbPool, DieselNetworkNodeRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/network")).await?;
    /// let repository = DieselNetworkNodeRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NetworkNodeRepositoryError {
    NetworkNodeRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> NetworkNodeRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => NetworkNodeRepositoryError::connection(message),
        StoreFailure::UniqueViolation { constraint }
        | StoreFailure::ForeignKeyViolation { constraint } => NetworkNodeRepositoryError::query(
            format!("constraint violated: {}", constraint.unwrap_or_default()),
        ),
        StoreFailure::Query(message) => NetworkNodeRepositoryError::query(message),
    }
}

fn reject(error: impl Into<NetworkNodeRepositoryError>) -> NodeTx {
    TxError::Rejected(error.into())
}

async fn ensure_contact(conn: &mut AsyncPgConnection, id: ContactId) -> Result<(), NodeTx> {
    let found: bool = diesel::select(exists(contacts::table.find(id.value())))
        .get_result(conn)
        .await?;
    if found {
        Ok(())
    } else {
        Err(reject(NetworkNodeRepositoryError::ContactNotFound { id }))
    }
}

async fn ensure_products(conn: &mut AsyncPgConnection, ids: &[ProductId]) -> Result<(), NodeTx> {
    if ids.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i64> = ids.iter().map(|id| id.value()).collect();
    let found: Vec<i64> = products::table
        .filter(products::id.eq_any(&wanted))
        .select(products::id)
        .load(conn)
        .await?;
    match ids.iter().find(|id| !found.contains(&id.value())) {
        Some(&id) => Err(reject(NetworkNodeRepositoryError::ProductNotFound { id })),
        None => Ok(()),
    }
}

async fn load_hierarchy(conn: &mut AsyncPgConnection) -> Result<SupplyHierarchy, NodeTx> {
    let links = load_links(conn).await?;
    SupplyHierarchy::from_links(links).map_err(reject)
}

fn product_columns(ids: &[ProductId]) -> Vec<i64> {
    ids.iter().map(|id| id.value()).collect()
}

fn day_start(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

type BoxedNodeQuery<'a> = network_nodes::BoxedQuery<'a, Pg>;

fn filtered(query: &NodeListQuery) -> Result<BoxedNodeQuery<'static>, NetworkNodeRepositoryError> {
    let filter = &query.filter;
    let mut statement = network_nodes::table.into_boxed::<Pg>();

    if let Some(country) = filter.country.as_deref() {
        statement = statement.filter(
            network_nodes::contact_id.eq_any(
                contacts::table
                    .filter(contacts::country.ilike(contains_pattern(country)))
                    .select(contacts::id),
            ),
        );
    }
    if let Some(city) = filter.city.as_deref() {
        statement = statement.filter(
            network_nodes::contact_id.eq_any(
                contacts::table
                    .filter(contacts::city.ilike(contains_pattern(city)))
                    .select(contacts::id),
            ),
        );
    }
    if let Some(level) = filter.level {
        let column = level_column(level).map_err(map_diesel_error)?;
        statement = statement.filter(network_nodes::level.eq(column));
    }
    if let Some(after) = filter.created_after {
        statement = statement.filter(network_nodes::created_at.ge(day_start(after)));
    }
    if let Some(before) = filter.created_before {
        if let Some(next_day) = before.checked_add_days(Days::new(1)) {
            statement = statement.filter(network_nodes::created_at.lt(day_start(next_day)));
        }
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        statement = statement.filter(
            network_nodes::name.ilike(pattern.clone()).or(network_nodes::contact_id.eq_any(
                contacts::table
                    .filter(
                        contacts::city
                            .ilike(pattern.clone())
                            .or(contacts::country.ilike(pattern)),
                    )
                    .select(contacts::id),
            )),
        );
    }
    Ok(statement)
}

/// Names compared byte by byte, as `str` orders them in the memory store,
/// whatever collation the database was created with.
fn name_order() -> SqlLiteral<Text> {
    sql::<Text>(r#"network_nodes.name COLLATE "C""#)
}

fn ordered(statement: BoxedNodeQuery<'static>, query: &NodeListQuery) -> BoxedNodeQuery<'static> {
    let descending = query.ordering.descending;
    let statement = match (query.ordering.field, descending) {
        (OrderField::Name, false) => statement.order_by(name_order().asc()),
        (OrderField::Name, true) => statement.order_by(name_order().desc()),
        (OrderField::Level, false) => statement.order_by(network_nodes::level.asc()),
        (OrderField::Level, true) => statement.order_by(network_nodes::level.desc()),
        (OrderField::Debt, false) => statement.order_by(network_nodes::debt.asc()),
        (OrderField::Debt, true) => statement.order_by(network_nodes::debt.desc()),
        (OrderField::CreatedAt, false) => statement.order_by(network_nodes::created_at.asc()),
        (OrderField::CreatedAt, true) => statement.order_by(network_nodes::created_at.desc()),
    };
    statement.then_order_by(network_nodes::id.asc())
}

#[async_trait]
impl NetworkNodeRepository for DieselNetworkNodeRepository {
    async fn create(&self, node: NewNetworkNode) -> Result<NetworkNode, NetworkNodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let NewNetworkNode {
                    draft,
                    debt,
                    created_at,
                } = node;
                ensure_contact(conn, draft.contact_id).await?;
                ensure_products(conn, &draft.product_ids).await?;
                let level = load_hierarchy(conn)
                    .await?
                    .level_under(draft.supplier_id)
                    .map_err(reject)?;

                let id: i64 = diesel::insert_into(network_nodes::table)
                    .values(&NewNodeRow {
                        name: draft.name.as_str(),
                        contact_id: draft.contact_id.value(),
                        supplier_id: draft.supplier_id.map(NodeId::value),
                        debt: debt.amount(),
                        level: level_column(level)?,
                        created_at,
                    })
                    .returning(network_nodes::id)
                    .get_result(conn)
                    .await?;
                replace_products(conn, id, &product_columns(&draft.product_ids)).await?;

                find_node(conn, id)
                    .await?
                    .ok_or_else(|| reject(NetworkNodeRepositoryError::NodeNotFound { id: NodeId::new(id) }))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: NodeTx| err.resolve(map_diesel_error))
    }

    async fn update(
        &self,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<NodeUpdate, NetworkNodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let present: bool = diesel::select(exists(network_nodes::table.find(id.value())))
                    .get_result(conn)
                    .await?;
                if !present {
                    return Err(reject(NetworkNodeRepositoryError::NodeNotFound { id }));
                }
                if let Some(contact) = patch.contact_id {
                    ensure_contact(conn, contact).await?;
                }
                if let Some(product_ids) = patch.product_ids.as_deref() {
                    ensure_products(conn, product_ids).await?;
                }

                let level_changes = match patch.supplier_id {
                    Some(supplier) => {
                        let changes = load_hierarchy(conn)
                            .await?
                            .reparent(id, supplier)
                            .map_err(reject)?;
                        diesel::update(network_nodes::table.find(id.value()))
                            .set(network_nodes::supplier_id.eq(supplier.map(NodeId::value)))
                            .execute(conn)
                            .await?;
                        write_levels(conn, &changes).await?;
                        changes
                    }
                    None => Vec::new(),
                };

                if patch.name.is_some() || patch.contact_id.is_some() {
                    diesel::update(network_nodes::table.find(id.value()))
                        .set(&NodeChangeset {
                            name: patch.name.as_ref().map(|name| name.as_str()),
                            contact_id: patch.contact_id.map(ContactId::value),
                        })
                        .execute(conn)
                        .await?;
                }
                if let Some(product_ids) = patch.product_ids.as_deref() {
                    replace_products(conn, id.value(), &product_columns(product_ids)).await?;
                }

                let node = find_node(conn, id.value())
                    .await?
                    .ok_or_else(|| reject(NetworkNodeRepositoryError::NodeNotFound { id }))?;
                Ok(NodeUpdate {
                    node,
                    level_changes,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: NodeTx| err.resolve(map_diesel_error))
    }

    async fn delete(&self, id: NodeId) -> Result<Option<Detachment>, NetworkNodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut hierarchy = load_hierarchy(conn).await?;
                if !hierarchy.contains(id) {
                    return Ok(None);
                }
                let detachment = hierarchy.remove(&[id]);
                // Dependents lose their supplier through ON DELETE SET NULL.
                diesel::delete(network_nodes::table.find(id.value()))
                    .execute(conn)
                    .await?;
                write_levels(conn, &detachment.relevelled).await?;
                Ok(Some(detachment))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: NodeTx| err.resolve(map_diesel_error))
    }

    async fn find(&self, id: NodeId) -> Result<Option<NetworkNode>, NetworkNodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        find_node(&mut conn, id.value())
            .await
            .map_err(map_diesel_error)
    }

    async fn list(&self, query: NodeListQuery) -> Result<NodePage, NetworkNodeRepositoryError> {
        let (offset, fetch) = sql_window(query.offset, query.limit);
        let statement = ordered(filtered(&query)?, &query)
            .select(NodeRow::as_select())
            .offset(offset)
            .limit(fetch);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NodeRow> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let has_more = rows.len() > query.limit;
        let rows = rows.into_iter().take(query.limit).collect();
        let nodes = hydrate(&mut conn, rows).await.map_err(map_diesel_error)?;
        Ok(NodePage { nodes, has_more })
    }

    async fn list_by_level(
        &self,
        level: NodeLevel,
    ) -> Result<Vec<NetworkNode>, NetworkNodeRepositoryError> {
        let column = level_column(level).map_err(map_diesel_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NodeRow> = network_nodes::table
            .filter(network_nodes::level.eq(column))
            .order((name_order().asc(), network_nodes::id.asc()))
            .select(NodeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await.map_err(map_diesel_error)
    }

    async fn clear_debt(&self, ids: Vec<NodeId>) -> Result<u64, NetworkNodeRepositoryError> {
        let ids: Vec<i64> = ids.into_iter().map(NodeId::value).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let cleared = diesel::update(network_nodes::table.filter(network_nodes::id.eq_any(ids)))
            .set(network_nodes::debt.eq(Debt::ZERO.amount()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(cleared).unwrap_or(u64::MAX))
    }
}
