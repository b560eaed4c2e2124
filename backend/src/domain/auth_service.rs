//! Registration and login use-cases.
//!
//! Owns credential handling end to end: input validation, hash derivation,
//! and the deliberately vague "invalid email or password" answer for every
//! login failure so callers cannot probe which emails are registered.
//! Registration signs the new account in immediately.

use std::sync::Arc;

use serde_json::json;

use crate::domain::Error;
use crate::domain::account::{
    AccountName, AccountValidationError, Email, NewAccount, PASSWORD_MIN_LEN,
};
use crate::domain::password::{PasswordHash, PasswordHashError};
use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::session::Session;

/// Raw signup form input, unvalidated.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Requested login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Raw secret; hashed before it reaches any store.
    pub password: String,
}

/// Raw login form input, unvalidated.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Raw secret.
    pub password: String,
}

/// Domain service for signup and login.
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
}

impl AuthService {
    /// Create the service over an account store.
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Create an account and sign it in.
    ///
    /// Duplicate emails surface as a conflict; field-level validation
    /// failures name the offending field in the error details.
    pub async fn register(&self, registration: Registration) -> Result<Session, Error> {
        let email = Email::new(registration.email).map_err(|e| field_error(&e, "email"))?;
        let name = AccountName::new(registration.name).map_err(|e| field_error(&e, "name"))?;
        if registration.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(field_error(
                &AccountValidationError::PasswordTooShort,
                "password",
            ));
        }
        let password_hash = PasswordHash::derive(&registration.password).map_err(map_hash_error)?;

        let account = self
            .accounts
            .insert(NewAccount {
                email,
                name,
                password_hash,
            })
            .await
            .map_err(map_account_error)?;
        Ok(Session::for_account(&account))
    }

    /// Check credentials and return the authenticated session.
    pub async fn login(&self, credentials: Credentials) -> Result<Session, Error> {
        // A malformed email can never match a stored (validated) one, so it
        // gets the same answer as a wrong password.
        let Ok(email) = Email::new(credentials.email) else {
            return Err(invalid_credentials());
        };
        let account = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(map_account_error)?
            .ok_or_else(invalid_credentials)?;
        if !account
            .password_hash()
            .verify(&credentials.password)
            .map_err(map_hash_error)?
        {
            return Err(invalid_credentials());
        }
        Ok(Session::for_account(&account))
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid email or password")
}

fn field_error(error: &AccountValidationError, field: &str) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::DuplicateEmail => {
            Error::conflict("an account with this email already exists")
        }
        AccountRepositoryError::Connection { message } | AccountRepositoryError::Query { message } => {
            Error::internal(format!("account store failed: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("credential hashing failed: {error}"))
}
