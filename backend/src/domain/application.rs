//! Job application record and its input shapes.
//!
//! A record is exclusively owned by one account and only ever mutated
//! through the application repository. Title and company are the only
//! required fields; everything else the form collects is optional free text.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountId;
use crate::domain::lifecycle::LifecycleStatus;

/// Validation errors for application input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationValidationError {
    /// Title is empty once trimmed.
    #[error("job title must not be empty")]
    EmptyTitle,
    /// Company is empty once trimmed.
    #[error("company must not be empty")]
    EmptyCompany,
}

impl ApplicationValidationError {
    /// The offending field name, for error details.
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyCompany => "company",
        }
    }
}

/// Monotonically assigned record identifier, unique per store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ApplicationId(i64);

impl ApplicationId {
    /// Wrap a store-assigned identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty job title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobTitle(String);

impl JobTitle {
    /// Validate and construct a [`JobTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, ApplicationValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ApplicationValidationError::EmptyTitle);
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for JobTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JobTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<JobTitle> for String {
    fn from(value: JobTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for JobTitle {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-empty company name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyName(String);

impl CompanyName {
    /// Validate and construct a [`CompanyName`].
    pub fn new(company: impl Into<String>) -> Result<Self, ApplicationValidationError> {
        let company = company.into();
        if company.trim().is_empty() {
            return Err(ApplicationValidationError::EmptyCompany);
        }
        Ok(Self(company))
    }
}

impl AsRef<str> for CompanyName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CompanyName> for String {
    fn from(value: CompanyName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CompanyName {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One tracked job-search record.
///
/// ## Invariants
/// - `title` and `company` are non-empty.
/// - `id` is unique and monotonically assigned by the owning store.
#[derive(Debug, Clone, PartialEq)]
pub struct JobApplication {
    /// Store-assigned identifier.
    pub id: ApplicationId,
    /// Owning account.
    pub account_id: AccountId,
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
    /// Salary text as entered (no parsing).
    pub salary: Option<String>,
    /// Current lifecycle stage.
    pub status: LifecycleStatus,
    /// Calendar date the application was sent.
    pub date_applied: NaiveDate,
    /// Record creation timestamp; drives newest-first ordering.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a record.
///
/// Defaults (status `Applied`, today's date) are applied by the service
/// before this reaches a repository, so adapters never guess.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
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
    /// Lifecycle stage to start in.
    pub status: LifecycleStatus,
    /// Calendar date the application was sent.
    pub date_applied: NaiveDate,
}

/// Partial update for an existing record.
///
/// `None` fields keep their prior values; optional text fields use a nested
/// `Option` so callers can distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    /// Replacement title.
    pub title: Option<JobTitle>,
    /// Replacement company.
    pub company: Option<CompanyName>,
    /// Replacement contact (`Some(None)` clears it).
    pub contact: Option<Option<String>>,
    /// Replacement contact email.
    pub contact_email: Option<Option<String>>,
    /// Replacement posting link.
    pub source_url: Option<Option<String>>,
    /// Replacement notes.
    pub notes: Option<Option<String>>,
    /// Replacement salary text.
    pub salary: Option<Option<String>>,
    /// Replacement lifecycle stage.
    pub status: Option<LifecycleStatus>,
    /// Replacement application date.
    pub date_applied: Option<NaiveDate>,
}

impl ApplicationPatch {
    /// True when the patch changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company.is_none()
            && self.contact.is_none()
            && self.contact_email.is_none()
            && self.source_url.is_none()
            && self.notes.is_none()
            && self.salary.is_none()
            && self.status.is_none()
            && self.date_applied.is_none()
    }

    /// Apply this patch to a record, returning the merged result.
    pub fn apply_to(&self, mut record: JobApplication) -> JobApplication {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(company) = &self.company {
            record.company = company.clone();
        }
        if let Some(contact) = &self.contact {
            record.contact = contact.clone();
        }
        if let Some(contact_email) = &self.contact_email {
            record.contact_email = contact_email.clone();
        }
        if let Some(source_url) = &self.source_url {
            record.source_url = source_url.clone();
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
        if let Some(salary) = &self.salary {
            record.salary = salary.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(date_applied) = self.date_applied {
            record.date_applied = date_applied;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record() -> JobApplication {
        JobApplication {
            id: ApplicationId::new(1),
            account_id: AccountId::random(),
            title: JobTitle::new("Engineer").expect("valid title"),
            company: CompanyName::new("Acme").expect("valid company"),
            contact: Some("Jo".into()),
            contact_email: None,
            source_url: None,
            notes: None,
            salary: None,
            status: LifecycleStatus::Applied,
            date_applied: NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date"),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("", ApplicationValidationError::EmptyTitle)]
    #[case("   ", ApplicationValidationError::EmptyTitle)]
    fn title_must_be_non_empty(#[case] input: &str, #[case] expected: ApplicationValidationError) {
        assert_eq!(JobTitle::new(input), Err(expected));
    }

    #[rstest]
    #[case("", ApplicationValidationError::EmptyCompany)]
    #[case("  \t ", ApplicationValidationError::EmptyCompany)]
    fn company_must_be_non_empty(
        #[case] input: &str,
        #[case] expected: ApplicationValidationError,
    ) {
        assert_eq!(CompanyName::new(input), Err(expected));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let before = record();
        let after = ApplicationPatch::default().apply_to(before.clone());
        assert_eq!(before, after);
        assert!(ApplicationPatch::default().is_empty());
    }

    #[test]
    fn patch_replaces_only_provided_fields() {
        let patch = ApplicationPatch {
            title: Some(JobTitle::new("Staff Engineer").expect("valid title")),
            status: Some(LifecycleStatus::Interview),
            contact: Some(None),
            ..ApplicationPatch::default()
        };
        let after = patch.apply_to(record());
        assert_eq!(after.title.as_ref(), "Staff Engineer");
        assert_eq!(after.status, LifecycleStatus::Interview);
        assert_eq!(after.contact, None);
        // Untouched fields survive.
        assert_eq!(after.company.as_ref(), "Acme");
    }

    #[test]
    fn validation_error_names_the_field() {
        assert_eq!(ApplicationValidationError::EmptyTitle.field(), "title");
        assert_eq!(ApplicationValidationError::EmptyCompany.field(), "company");
    }
}
