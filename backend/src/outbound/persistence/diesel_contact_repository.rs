//! PostgreSQL-backed contact repository.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ContactRemoval, ContactRepository, ContactRepositoryError};
use crate::domain::{Contact, ContactDraft, ContactId, ListWindow, NodeId, Page, SupplyHierarchy};

use super::error_mapping::{StoreFailure, TxError, classify, pool_message};
use super::models::{ContactRow, NewContactRow};
use super::node_rows::{load_links, sql_window, write_levels};
use super::pool::{DbPool, PoolError};
use super::schema::{contacts, network_nodes};

/// Diesel-backed implementation of [`ContactRepository`].
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactRepositoryError {
    ContactRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => ContactRepositoryError::connection(message),
        StoreFailure::UniqueViolation { constraint }
        | StoreFailure::ForeignKeyViolation { constraint } => ContactRepositoryError::query(
            format!("constraint violated: {}", constraint.unwrap_or_default()),
        ),
        StoreFailure::Query(message) => ContactRepositoryError::query(message),
    }
}

fn map_insert_error(error: diesel::result::Error, email: &str) -> ContactRepositoryError {
    match classify(error) {
        StoreFailure::UniqueViolation { .. } => ContactRepositoryError::duplicate_email(email),
        StoreFailure::Connection(message) => ContactRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { constraint } => ContactRepositoryError::query(
            format!("constraint violated: {}", constraint.unwrap_or_default()),
        ),
        StoreFailure::Query(message) => ContactRepositoryError::query(message),
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn create(&self, draft: ContactDraft) -> Result<Contact, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewContactRow {
            email: draft.email.as_str(),
            country: draft.country.as_str(),
            city: draft.city.as_str(),
            street: draft.street.as_str(),
            house_number: draft.house_number.as_str(),
        };
        let id: i64 = diesel::insert_into(contacts::table)
            .values(&row)
            .returning(contacts::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, draft.email.as_str()))?;
        Ok(Contact::from_draft(ContactId::new(id), draft))
    }

    async fn find(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = contacts::table
            .find(id.value())
            .select(ContactRow::as_select())
            .first::<ContactRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Contact::from))
    }

    async fn list(&self, window: ListWindow) -> Result<Page<Contact>, ContactRepositoryError> {
        let (offset, fetch) = sql_window(window.offset, window.limit);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContactRow> = contacts::table
            .order(contacts::id.asc())
            .offset(offset)
            .limit(fetch)
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::from_overfetch(
            rows.into_iter().map(Contact::from).collect(),
            window.limit,
        ))
    }

    async fn delete(
        &self,
        id: ContactId,
    ) -> Result<Option<ContactRemoval>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let present: bool =
                    diesel::select(exists(contacts::table.find(id.value())))
                        .get_result(conn)
                        .await?;
                if !present {
                    return Ok(None);
                }
                let owned: Vec<NodeId> = network_nodes::table
                    .filter(network_nodes::contact_id.eq(id.value()))
                    .select(network_nodes::id)
                    .load::<i64>(conn)
                    .await?
                    .into_iter()
                    .map(NodeId::new)
                    .collect();
                let mut hierarchy = SupplyHierarchy::from_links(load_links(conn).await?)
                    .map_err(|err| TxError::Rejected(ContactRepositoryError::query(err.to_string())))?;
                let detachment = hierarchy.remove(&owned);

                // Owned nodes cascade with the contact; their dependents lose
                // the supplier through ON DELETE SET NULL.
                diesel::delete(contacts::table.find(id.value()))
                    .execute(conn)
                    .await?;
                write_levels(conn, &detachment.relevelled).await?;
                Ok(Some(ContactRemoval {
                    removed_nodes: detachment.removed,
                    detached_nodes: detachment.detached,
                    relevelled: detachment.relevelled.len(),
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: TxError<ContactRepositoryError>| err.resolve(map_diesel_error))
    }
}
