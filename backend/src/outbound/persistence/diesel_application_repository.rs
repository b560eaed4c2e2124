//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Every query carries the owning account's id in its filter, so a record
//! belonging to another account is indistinguishable from a missing one.
//! Patch merging happens in the domain; this adapter reads the current row,
//! lets the patch produce the merged record, and writes the result back as a
//! whole changeset.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::account::AccountId;
use crate::domain::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, CompanyName, JobApplication, JobTitle,
};
use crate::domain::lifecycle::LifecycleStatus;
use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};

use super::models::{ApplicationRow, ApplicationUpdate, NewApplicationRow};
use super::pool::{DbPool, PoolError};
use super::schema::job_applications;

/// Diesel-backed implementation of the `ApplicationRepository` port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ApplicationRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ApplicationRepositoryError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ApplicationRepositoryError::connection("database connection error")
        }
        _ => ApplicationRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain record.
fn row_to_application(row: ApplicationRow) -> Result<JobApplication, ApplicationRepositoryError> {
    let title = JobTitle::new(row.title).map_err(|err| {
        ApplicationRepositoryError::query(format!("corrupted title in database: {err}"))
    })?;
    let company = CompanyName::new(row.company).map_err(|err| {
        ApplicationRepositoryError::query(format!("corrupted company in database: {err}"))
    })?;
    let status = LifecycleStatus::parse(&row.status).ok_or_else(|| {
        ApplicationRepositoryError::query(format!("unknown status in database: {}", row.status))
    })?;
    Ok(JobApplication {
        id: ApplicationId::new(row.id),
        account_id: AccountId::from_uuid(row.account_id),
        title,
        company,
        contact: row.contact,
        contact_email: row.contact_email,
        source_url: row.source_url,
        notes: row.notes,
        salary: row.salary,
        status,
        date_applied: row.date_applied,
        created_at: row.created_at,
    })
}

fn update_from(record: &JobApplication) -> ApplicationUpdate<'_> {
    ApplicationUpdate {
        title: record.title.as_ref(),
        company: record.company.as_ref(),
        contact: record.contact.as_deref(),
        contact_email: record.contact_email.as_deref(),
        source_url: record.source_url.as_deref(),
        notes: record.notes.as_deref(),
        salary: record.salary.as_deref(),
        status: record.status.as_str(),
        date_applied: record.date_applied,
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn list_for_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<JobApplication>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ApplicationRow> = job_applications::table
            .filter(job_applications::account_id.eq(account.as_uuid()))
            .order((
                job_applications::created_at.desc(),
                job_applications::id.desc(),
            ))
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_application).collect()
    }

    async fn insert(
        &self,
        account: AccountId,
        draft: ApplicationDraft,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewApplicationRow {
            account_id: *account.as_uuid(),
            title: draft.title.as_ref(),
            company: draft.company.as_ref(),
            contact: draft.contact.as_deref(),
            contact_email: draft.contact_email.as_deref(),
            source_url: draft.source_url.as_deref(),
            notes: draft.notes.as_deref(),
            salary: draft.salary.as_deref(),
            status: draft.status.as_str(),
            date_applied: draft.date_applied,
        };
        let row: ApplicationRow = diesel::insert_into(job_applications::table)
            .values(&new_row)
            .returning(ApplicationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_application(row)
    }

    async fn update(
        &self,
        account: AccountId,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = job_applications::table
            .filter(
                job_applications::id
                    .eq(id.as_i64())
                    .and(job_applications::account_id.eq(account.as_uuid())),
            )
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let current = row_to_application(row.ok_or(ApplicationRepositoryError::NotFound)?)?;
        let merged = patch.apply_to(current);

        let row: ApplicationRow = diesel::update(
            job_applications::table.filter(
                job_applications::id
                    .eq(id.as_i64())
                    .and(job_applications::account_id.eq(account.as_uuid())),
            ),
        )
        .set(update_from(&merged))
        .returning(ApplicationRow::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        row_to_application(row)
    }

    async fn set_status(
        &self,
        account: AccountId,
        id: ApplicationId,
        status: LifecycleStatus,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = diesel::update(
            job_applications::table.filter(
                job_applications::id
                    .eq(id.as_i64())
                    .and(job_applications::account_id.eq(account.as_uuid())),
            ),
        )
        .set(job_applications::status.eq(status.as_str()))
        .returning(ApplicationRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row_to_application(row.ok_or(ApplicationRepositoryError::NotFound)?)
    }

    async fn delete(
        &self,
        account: AccountId,
        id: ApplicationId,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            job_applications::table.filter(
                job_applications::id
                    .eq(id.as_i64())
                    .and(job_applications::account_id.eq(account.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(ApplicationRepositoryError::NotFound);
        }
        Ok(())
    }
}
