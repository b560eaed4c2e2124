//! Account data model.
//!
//! Accounts are created at registration and never mutated afterwards
//! (credential rotation is not implemented). Email uniqueness is enforced by
//! the account repository at creation time.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::password::PasswordHash;

/// Validation errors returned by the account value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Email is empty or does not look like `local@domain.tld`.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Display name is empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Password is shorter than [`PASSWORD_MIN_LEN`] characters.
    #[error("password must be at least {PASSWORD_MIN_LEN} characters")]
    PasswordTooShort,
}

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Stable account identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Same permissive shape the signup form accepts: something@something.tld
        // with no whitespace. Deliverability is not our problem.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`], lowercasing for comparison.
    pub fn new(email: impl Into<String>) -> Result<Self, AccountValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(email.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name shown in the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Validate and construct an [`AccountName`].
    pub fn new(name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user identity.
///
/// ## Invariants
/// - `email` is unique per store (enforced by the repository).
/// - the credential is only ever held as an Argon2id hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    email: Email,
    name: AccountName,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Assemble an account from validated components.
    pub const fn new(
        id: AccountId,
        email: Email,
        name: AccountName,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            created_at,
        }
    }

    /// Stable account identifier.
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// Unique login email.
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    pub const fn name(&self) -> &AccountName {
        &self.name
    }

    /// Stored credential hash.
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Registration timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields required to persist a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Unique login email.
    pub email: Email,
    /// Display name.
    pub name: AccountName,
    /// Derived credential hash; never the raw secret.
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("demo@example.com", true)]
    #[case("first.last@sub.domain.org", true)]
    #[case("missing-at.example.com", false)]
    #[case("two@@example.com", false)]
    #[case("spaces in@example.com", false)]
    #[case("no-tld@example", false)]
    #[case("", false)]
    fn email_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(Email::new(input).is_ok(), ok, "input: {input:?}");
    }

    #[test]
    fn email_is_lowercased_for_comparison() {
        let email = Email::new("Demo@Example.COM").expect("valid email");
        assert_eq!(email.as_ref(), "demo@example.com");
    }

    #[rstest]
    #[case("Demo", true)]
    #[case("   ", false)]
    #[case("", false)]
    fn name_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(AccountName::new(input).is_ok(), ok);
    }
}
