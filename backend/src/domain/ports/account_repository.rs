//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::account::{Account, AccountId, Email, NewAccount};

/// Persistence errors raised by account repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountRepositoryError {
    /// Repository connection could not be established.
    #[error("account repository connection failed: {message}")]
    Connection {
        /// Adapter-level connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("account repository query failed: {message}")]
    Query {
        /// Adapter-level query failure.
        message: String,
    },
    /// Another account already owns the requested email.
    #[error("an account with this email already exists")]
    DuplicateEmail,
}

impl AccountRepositoryError {
    /// Build a [`AccountRepositoryError::Connection`] error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`AccountRepositoryError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for account persistence.
///
/// Emails are unique across the store; adapters surface a violation as
/// [`AccountRepositoryError::DuplicateEmail`] so callers can map it to a
/// conflict rather than a server fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Look up an account by its (already lowercased) email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<Account>, AccountRepositoryError>;

    /// Persist a new account, assigning its identifier and creation time.
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError>;
}

/// In-memory account store for tests and fixtures.
#[derive(Debug, Default)]
pub struct FixtureAccountRepository {
    accounts: std::sync::Mutex<Vec<Account>>,
}

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| AccountRepositoryError::query("account fixture poisoned"))?;
        Ok(accounts.iter().find(|a| a.email() == email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| AccountRepositoryError::query("account fixture poisoned"))?;
        if accounts.iter().any(|a| a.email() == &account.email) {
            return Err(AccountRepositoryError::DuplicateEmail);
        }
        let stored = Account::new(
            AccountId::random(),
            account.email,
            account.name,
            account.password_hash,
            Utc::now(),
        );
        accounts.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountName;
    use crate::domain::password::PasswordHash;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: Email::new(email).expect("valid email"),
            name: AccountName::new("Demo").expect("valid name"),
            password_hash: PasswordHash::from_phc_string("$argon2id$stub"),
        }
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let repo = FixtureAccountRepository::default();
        let inserted = repo
            .insert(new_account("demo@example.com"))
            .await
            .expect("insert account");
        let found = repo
            .find_by_email(inserted.email())
            .await
            .expect("query account");
        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = FixtureAccountRepository::default();
        repo.insert(new_account("demo@example.com"))
            .await
            .expect("first insert");
        let err = repo
            .insert(new_account("demo@example.com"))
            .await
            .expect_err("second insert must fail");
        assert_eq!(err, AccountRepositoryError::DuplicateEmail);
    }

    #[tokio::test]
    async fn unknown_email_finds_nothing() {
        let repo = FixtureAccountRepository::default();
        let email = Email::new("nobody@example.com").expect("valid email");
        assert_eq!(repo.find_by_email(&email).await, Ok(None));
    }
}
