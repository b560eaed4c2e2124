//! Job-application use-cases.
//!
//! Thin orchestration over the application repository: fills creation
//! defaults from the injected clock, maps persistence errors into the
//! domain envelope, and feeds the flow aggregation. Everything is scoped
//! to the calling account.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::Error;
use crate::domain::account::AccountId;
use crate::domain::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, CompanyName, JobApplication, JobTitle,
};
use crate::domain::flow::{FlowGraph, flow_graph};
use crate::domain::lifecycle::LifecycleStatus;
use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};

/// Validated creation input before defaults are filled in.
///
/// `status` and `date_applied` are optional here; the service resolves them
/// to `Applied` and the clock's current date.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    /// Role applied for.
    pub title: JobTitle,
    /// Target company.
    pub company: CompanyName,
    /// Contact person, if known.
    pub contact: Option<String>,
    /// Contact email, if known.
    pub contact_email: Option<String>,
    /// Link to the job posting.
    pub source_url: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Salary text as entered.
    pub salary: Option<String>,
    /// Lifecycle stage, defaulting to `Applied`.
    pub status: Option<LifecycleStatus>,
    /// Application date, defaulting to today.
    pub date_applied: Option<chrono::NaiveDate>,
}

/// Domain service for the tracked application set.
pub struct ApplicationsService {
    applications: Arc<dyn ApplicationRepository>,
    clock: Arc<dyn Clock>,
}

impl ApplicationsService {
    /// Create the service over an application store and a clock.
    pub fn new(applications: Arc<dyn ApplicationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            clock,
        }
    }

    /// All records owned by the account, newest first.
    pub async fn list(&self, account: AccountId) -> Result<Vec<JobApplication>, Error> {
        self.applications
            .list_for_account(account)
            .await
            .map_err(map_application_error)
    }

    /// Create a record, defaulting status and date when omitted.
    pub async fn create(
        &self,
        account: AccountId,
        input: CreateApplication,
    ) -> Result<JobApplication, Error> {
        let draft = ApplicationDraft {
            title: input.title,
            company: input.company,
            contact: input.contact,
            contact_email: input.contact_email,
            source_url: input.source_url,
            notes: input.notes,
            salary: input.salary,
            status: input.status.unwrap_or(LifecycleStatus::default_for_new()),
            date_applied: input
                .date_applied
                .unwrap_or_else(|| self.clock.utc().date_naive()),
        };
        self.applications
            .insert(account, draft)
            .await
            .map_err(map_application_error)
    }

    /// Merge a patch into an existing record.
    pub async fn update(
        &self,
        account: AccountId,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, Error> {
        self.applications
            .update(account, id, patch)
            .await
            .map_err(map_application_error)
    }

    /// Reclassify a record's lifecycle stage. Any stage may follow any
    /// other, mirroring the board's free drag-and-drop.
    pub async fn set_status(
        &self,
        account: AccountId,
        id: ApplicationId,
        status: LifecycleStatus,
    ) -> Result<JobApplication, Error> {
        self.applications
            .set_status(account, id, status)
            .await
            .map_err(map_application_error)
    }

    /// Remove a record permanently.
    pub async fn delete(&self, account: AccountId, id: ApplicationId) -> Result<(), Error> {
        self.applications
            .delete(account, id)
            .await
            .map_err(map_application_error)
    }

    /// Aggregate the account's records into the outcome diagram.
    ///
    /// `None` means the account has no records and nothing to draw.
    pub async fn flow(&self, account: AccountId) -> Result<Option<FlowGraph>, Error> {
        let records = self.list(account).await?;
        Ok(flow_graph(&records))
    }
}

fn map_application_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::NotFound => Error::not_found("application not found"),
        ApplicationRepositoryError::Connection { message }
        | ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application store failed: {message}"))
        }
    }
}
