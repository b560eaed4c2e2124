//! Single-file JSON store for deployments without PostgreSQL.
//!
//! Persists the whole tracker state (accounts, applications, and the id
//! counter) as one JSON document, matching the layout the original
//! browser-local tracker kept. Filesystem access goes through `cap-std` so
//! the process only ever touches the configured data directory. Writes are
//! staged to a temporary file and renamed into place, so a crash mid-write
//! never leaves a truncated document behind.
//!
//! The document is small by construction (one person's job search), so the
//! store keeps it in memory behind a mutex and rewrites the file on every
//! mutation.

use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::{Account, AccountId, AccountName, Email, NewAccount};
use crate::domain::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, CompanyName, JobApplication, JobTitle,
};
use crate::domain::lifecycle::LifecycleStatus;
use crate::domain::password::PasswordHash;
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, ApplicationRepository, ApplicationRepositoryError,
};

/// Errors raised while opening the store file.
#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    /// The data directory or file could not be accessed.
    #[error("failed to access data file {path}: {source}")]
    Io {
        /// Configured data file path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a valid store document.
    #[error("data file {path} is not a valid store document: {source}")]
    Corrupt {
        /// Configured data file path.
        path: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAccount {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredApplication {
    id: i64,
    account_id: Uuid,
    title: String,
    company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salary: Option<String>,
    status: LifecycleStatus,
    date_applied: NaiveDate,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoreDocument {
    accounts: Vec<StoredAccount>,
    applications: Vec<StoredApplication>,
    next_application_id: i64,
}

/// File-backed store implementing both persistence ports.
#[derive(Debug)]
pub struct JsonStore {
    dir: Dir,
    file_name: String,
    path_label: String,
    state: Mutex<StoreDocument>,
}

impl JsonStore {
    /// Open (or create) the store at the given file path.
    ///
    /// Parent directories are created as needed; a missing file starts the
    /// store empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JsonStoreError> {
        let path = path.as_ref();
        let path_label = path.display().to_string();
        let io_error = |source| JsonStoreError::Io {
            path: path_label.clone(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                io_error(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "data file path has no file name",
                ))
            })?
            .to_string_lossy()
            .into_owned();

        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;

        let state = match dir.read_to_string(&file_name) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| JsonStoreError::Corrupt {
                    path: path_label.clone(),
                    source,
                })?
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => StoreDocument::default(),
            Err(error) => return Err(io_error(error)),
        };

        Ok(Self {
            dir,
            file_name,
            path_label,
            state: Mutex::new(state),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreDocument>, String> {
        self.state
            .lock()
            .map_err(|_| format!("store {} poisoned", self.path_label))
    }

    /// Rewrite the document via a staged temporary file.
    fn persist(&self, state: &StoreDocument) -> Result<(), String> {
        let contents = serde_json::to_vec_pretty(state)
            .map_err(|err| format!("failed to serialise store document: {err}"))?;
        let staged = format!(".tmp-{}-{}", self.file_name, Uuid::new_v4().simple());
        self.dir
            .write(&staged, &contents)
            .map_err(|err| format!("failed to stage store document: {err}"))?;

        match self.dir.remove_file(&self.file_name) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                let _cleanup = self.dir.remove_file(&staged);
                return Err(format!("failed to replace store document: {error}"));
            }
        }
        self.dir
            .rename(&staged, &self.dir, &self.file_name)
            .map_err(|err| format!("failed to commit store document: {err}"))
    }
}

fn stored_to_account(stored: &StoredAccount) -> Result<Account, String> {
    let email = Email::new(stored.email.clone())
        .map_err(|err| format!("corrupted email in store: {err}"))?;
    let name = AccountName::new(stored.name.clone())
        .map_err(|err| format!("corrupted account name in store: {err}"))?;
    Ok(Account::new(
        AccountId::from_uuid(stored.id),
        email,
        name,
        PasswordHash::from_phc_string(stored.password_hash.clone()),
        stored.created_at,
    ))
}

fn stored_to_application(stored: &StoredApplication) -> Result<JobApplication, String> {
    let title = JobTitle::new(stored.title.clone())
        .map_err(|err| format!("corrupted title in store: {err}"))?;
    let company = CompanyName::new(stored.company.clone())
        .map_err(|err| format!("corrupted company in store: {err}"))?;
    Ok(JobApplication {
        id: ApplicationId::new(stored.id),
        account_id: AccountId::from_uuid(stored.account_id),
        title,
        company,
        contact: stored.contact.clone(),
        contact_email: stored.contact_email.clone(),
        source_url: stored.source_url.clone(),
        notes: stored.notes.clone(),
        salary: stored.salary.clone(),
        status: stored.status,
        date_applied: stored.date_applied,
        created_at: stored.created_at,
    })
}

fn application_to_stored(record: &JobApplication) -> StoredApplication {
    StoredApplication {
        id: record.id.as_i64(),
        account_id: *record.account_id.as_uuid(),
        title: record.title.as_ref().to_owned(),
        company: record.company.as_ref().to_owned(),
        contact: record.contact.clone(),
        contact_email: record.contact_email.clone(),
        source_url: record.source_url.clone(),
        notes: record.notes.clone(),
        salary: record.salary.clone(),
        status: record.status,
        date_applied: record.date_applied,
        created_at: record.created_at,
    }
}

#[async_trait]
impl AccountRepository for JsonStore {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        state
            .accounts
            .iter()
            .find(|a| a.email == email.as_ref())
            .map(stored_to_account)
            .transpose()
            .map_err(AccountRepositoryError::query)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::query)?;
        if state
            .accounts
            .iter()
            .any(|a| a.email == account.email.as_ref())
        {
            return Err(AccountRepositoryError::DuplicateEmail);
        }
        let stored = StoredAccount {
            id: Uuid::new_v4(),
            email: account.email.as_ref().to_owned(),
            name: account.name.as_ref().to_owned(),
            password_hash: account.password_hash.as_phc_string().to_owned(),
            created_at: Utc::now(),
        };
        state.accounts.push(stored);
        self.persist(&state).map_err(AccountRepositoryError::query)?;
        let stored = state.accounts.last().ok_or_else(|| {
            AccountRepositoryError::query("inserted account vanished from store")
        })?;
        stored_to_account(stored).map_err(AccountRepositoryError::query)
    }
}

#[async_trait]
impl ApplicationRepository for JsonStore {
    async fn list_for_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<JobApplication>, ApplicationRepositoryError> {
        let state = self.lock().map_err(ApplicationRepositoryError::query)?;
        let mut records = state
            .applications
            .iter()
            .filter(|r| r.account_id == *account.as_uuid())
            .map(stored_to_application)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApplicationRepositoryError::query)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn insert(
        &self,
        account: AccountId,
        draft: ApplicationDraft,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut state = self.lock().map_err(ApplicationRepositoryError::query)?;
        state.next_application_id += 1;
        let record = JobApplication {
            id: ApplicationId::new(state.next_application_id),
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
        state.applications.push(application_to_stored(&record));
        self.persist(&state)
            .map_err(ApplicationRepositoryError::query)?;
        Ok(record)
    }

    async fn update(
        &self,
        account: AccountId,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut state = self.lock().map_err(ApplicationRepositoryError::query)?;
        let position = state
            .applications
            .iter()
            .position(|r| r.account_id == *account.as_uuid() && r.id == id.as_i64())
            .ok_or(ApplicationRepositoryError::NotFound)?;
        let current = stored_to_application(&state.applications[position])
            .map_err(ApplicationRepositoryError::query)?;
        let merged = patch.apply_to(current);
        state.applications[position] = application_to_stored(&merged);
        self.persist(&state)
            .map_err(ApplicationRepositoryError::query)?;
        Ok(merged)
    }

    async fn set_status(
        &self,
        account: AccountId,
        id: ApplicationId,
        status: LifecycleStatus,
    ) -> Result<JobApplication, ApplicationRepositoryError> {
        let mut state = self.lock().map_err(ApplicationRepositoryError::query)?;
        let stored = state
            .applications
            .iter_mut()
            .find(|r| r.account_id == *account.as_uuid() && r.id == id.as_i64())
            .ok_or(ApplicationRepositoryError::NotFound)?;
        stored.status = status;
        let record = stored_to_application(stored).map_err(ApplicationRepositoryError::query)?;
        self.persist(&state)
            .map_err(ApplicationRepositoryError::query)?;
        Ok(record)
    }

    async fn delete(
        &self,
        account: AccountId,
        id: ApplicationId,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut state = self.lock().map_err(ApplicationRepositoryError::query)?;
        let before = state.applications.len();
        state
            .applications
            .retain(|r| !(r.account_id == *account.as_uuid() && r.id == id.as_i64()));
        if state.applications.len() == before {
            return Err(ApplicationRepositoryError::NotFound);
        }
        self.persist(&state)
            .map_err(ApplicationRepositoryError::query)?;
        Ok(())
    }
}
