//! In-memory staff accounts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{StaffCredentialRecord, StaffRepository, StaffRepositoryError};
use crate::domain::{NewStaffAccount, StaffAccount, StaffId};

#[derive(Debug, Default)]
struct StaffState {
    records: BTreeMap<StaffId, StaffCredentialRecord>,
    last_id: i64,
}

/// Staff repository held in process memory. New accounts start active.
#[derive(Debug, Default)]
pub struct InMemoryStaffRepository {
    state: Mutex<StaffState>,
}

impl InMemoryStaffRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable an account. Returns `false` for unknown ids.
    pub async fn set_active(&self, id: StaffId, is_active: bool) -> bool {
        let mut state = self.state.lock().await;
        match state.records.get_mut(&id) {
            Some(record) => {
                record.account.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StaffCredentialRecord>, StaffRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .records
            .values()
            .find(|record| record.account.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: StaffId) -> Result<Option<StaffAccount>, StaffRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.records.get(&id).map(|record| record.account.clone()))
    }

    async fn create(&self, account: NewStaffAccount) -> Result<StaffAccount, StaffRepositoryError> {
        let mut state = self.state.lock().await;
        if state
            .records
            .values()
            .any(|record| record.account.username == account.username)
        {
            return Err(StaffRepositoryError::duplicate_username(account.username));
        }
        state.last_id = state.last_id.saturating_add(1);
        let created = StaffAccount {
            id: StaffId::new(state.last_id),
            username: account.username,
            is_active: true,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
        };
        state.records.insert(
            created.id,
            StaffCredentialRecord {
                account: created.clone(),
                password_hash: account.password_hash,
            },
        );
        Ok(created)
    }
}
