//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! All database operations are async via `diesel-async`. The unique index
//! on `accounts.email` is the authority on duplicates; a unique violation is
//! surfaced as [`AccountRepositoryError::DuplicateEmail`] rather than a
//! generic query failure so the domain can answer with a conflict.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::account::{Account, AccountId, AccountName, Email, NewAccount};
use crate::domain::password::PasswordHash;
use crate::domain::ports::{AccountRepository, AccountRepositoryError};

use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AccountRepositoryError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountRepositoryError::connection("database connection error")
        }
        _ => AccountRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain account.
fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let email = Email::new(row.email).map_err(|err| {
        AccountRepositoryError::query(format!("corrupted email in database: {err}"))
    })?;
    let name = AccountName::new(row.name).map_err(|err| {
        AccountRepositoryError::query(format!("corrupted account name in database: {err}"))
    })?;
    Ok(Account::new(
        AccountId::from_uuid(row.id),
        email,
        name,
        PasswordHash::from_phc_string(row.password_hash),
        row.created_at,
    ))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewAccountRow {
            id: Uuid::new_v4(),
            email: account.email.as_ref(),
            name: account.name.as_ref(),
            password_hash: account.password_hash.as_phc_string(),
        };
        let row: AccountRow = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_account(row)
    }
}
