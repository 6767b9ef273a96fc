//! PostgreSQL-backed staff account repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StaffCredentialRecord, StaffRepository, StaffRepositoryError};
use crate::domain::{NewStaffAccount, StaffAccount, StaffId};

use super::error_mapping::{StoreFailure, classify, pool_message};
use super::models::{NewStaffRow, StaffRow};
use super::pool::{DbPool, PoolError};
use super::schema::staff_accounts;

/// Diesel-backed implementation of [`StaffRepository`].
#[derive(Clone)]
pub struct DieselStaffRepository {
    pool: DbPool,
}

impl DieselStaffRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StaffRepositoryError {
    StaffRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> StaffRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => StaffRepositoryError::connection(message),
        StoreFailure::UniqueViolation { constraint }
        | StoreFailure::ForeignKeyViolation { constraint } => StaffRepositoryError::query(
            format!("constraint violated: {}", constraint.unwrap_or_default()),
        ),
        StoreFailure::Query(message) => StaffRepositoryError::query(message),
    }
}

#[async_trait]
impl StaffRepository for DieselStaffRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StaffCredentialRecord>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = staff_accounts::table
            .filter(staff_accounts::username.eq(username))
            .select(StaffRow::as_select())
            .first::<StaffRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| StaffCredentialRecord {
            account: row.account(),
            password_hash: row.password_hash,
        }))
    }

    async fn find_by_id(&self, id: StaffId) -> Result<Option<StaffAccount>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = staff_accounts::table
            .find(id.value())
            .select(StaffRow::as_select())
            .first::<StaffRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.as_ref().map(StaffRow::account))
    }

    async fn create(&self, account: NewStaffAccount) -> Result<StaffAccount, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(staff_accounts::table)
            .values(&NewStaffRow {
                username: account.username.as_str(),
                password_hash: account.password_hash.as_str(),
                is_staff: account.is_staff,
                is_superuser: account.is_superuser,
            })
            .returning(StaffRow::as_returning())
            .get_result::<StaffRow>(&mut conn)
            .await
            .map_err(|err| match classify(err) {
                StoreFailure::UniqueViolation { .. } => {
                    StaffRepositoryError::duplicate_username(account.username.as_str())
                }
                StoreFailure::Connection(message) => StaffRepositoryError::connection(message),
                StoreFailure::ForeignKeyViolation { constraint } => StaffRepositoryError::query(
                    format!("constraint violated: {}", constraint.unwrap_or_default()),
                ),
                StoreFailure::Query(message) => StaffRepositoryError::query(message),
            })?;
        Ok(row.account())
    }
}
