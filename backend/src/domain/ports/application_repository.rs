//! Port abstraction for job-application persistence adapters and their
//! errors.
//!
//! Every operation is scoped to the owning account: a record belonging to
//! another account behaves exactly like a missing one, so adapters never
//! leak existence across accounts.
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::account::AccountId;
use crate::domain::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, JobApplication,
};
use crate::domain::lifecycle::LifecycleStatus;

/// Persistence errors raised by application repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationRepositoryError {
    /// Repository connection could not be established.
    #[error("application repository connection failed: {message}")]
    Connection {
        /// Adapter-level connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("application repository query failed: {message}")]
    Query {
        /// Adapter-level query failure.
        message: String,
    },
    /// No record with this id exists for the account.
    #[error("application not found")]
    NotFound,
}

impl ApplicationRepositoryError {
    /// Build a [`ApplicationRepositoryError::Connection`] error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`ApplicationRepositoryError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for job-application persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// All records owned by the account, newest first.
    async fn list_for_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<JobApplication>, ApplicationRepositoryError>;

    /// Persist a new record, assigning its identifier and creation time.
    async fn insert(
        &self,
        account: AccountId,
        draft: ApplicationDraft,
    ) -> Result<JobApplication, ApplicationRepositoryError>;

    /// Merge a patch into an existing record and return the result.
    async fn update(
        &self,
        account: AccountId,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, ApplicationRepositoryError>;

    /// Reclassify a record's lifecycle stage.
    async fn set_status(
        &self,
        account: AccountId,
        id: ApplicationId,
        status: LifecycleStatus,
    ) -> Result<JobApplication, ApplicationRepositoryError>;

    /// Remove a record permanently.
    async fn delete(
        &self,
        account: AccountId,
        id: ApplicationId,
    ) -> Result<(), ApplicationRepositoryError>;
}

#[derive(Debug, Default)]
struct FixtureState {
    next_id: i64,
    records: Vec<JobApplication>,
}

/// In-memory application store for tests and fixtures.
#[derive(Debug, Default)]
pub struct FixtureApplicationRepository {
    state: std::sync::Mutex<FixtureState>,
}

impl FixtureApplicationRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, FixtureState>, ApplicationRepositoryError> {
        self.state
            .lock()
            .map_err(|_| ApplicationRepositoryError::query("application fixture poisoned"))
    }
}

#[async_trait]
impl ApplicationRepository for FixtureApplicationRepository {
    async fn list_for_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<JobApplication>, ApplicationRepositoryError> {
        let state = self.lock()?;
        let mut records: Vec<JobApplication> = state
            .records
            .iter()
            .filter(|r| r.account_id == account)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn insert(
        &self,
        account: AccountId,
        draft: ApplicationDraft,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let record = JobApplication {
            id: ApplicationId::new(state.next_id),
            account_id: account,
            title: draft.title,
            company: draft.company,
            contact: draft.contact,
            contact_email: draft.contact_email,
            source_url: draft.source_url,
            notes: draft.notes,
            salary: draft.salary,
            status: draft.status,
            date_applied: draft.date_applied,
            created_at: Utc::now(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        account: AccountId,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.account_id == account && r.id == id)
            .ok_or(ApplicationRepositoryError::NotFound)?;
        *record = patch.apply_to(record.clone());
        Ok(record.clone())
    }

    async fn set_status(
        &self,
        account: AccountId,
        id: ApplicationId,
        status: LifecycleStatus,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.account_id == account && r.id == id)
            .ok_or(ApplicationRepositoryError::NotFound)?;
        record.status = status;
        Ok(record.clone())
    }

    async fn delete(
        &self,
        account: AccountId,
        id: ApplicationId,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut state = self.lock()?;
        let before = state.records.len();
        state
            .records
            .retain(|r| !(r.account_id == account && r.id == id));
        if state.records.len() == before {
            return Err(ApplicationRepositoryError::NotFound);
        }
        Ok(())
    }
}
