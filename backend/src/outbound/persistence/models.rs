//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, job_applications};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the job_applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = job_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: i64,
    pub account_id: Uuid,
    pub title: String,
    pub company: String,
    pub contact: Option<String>,
    pub contact_email: Option<String>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
    pub salary: Option<String>,
    pub status: String,
    pub date_applied: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub account_id: Uuid,
    pub title: &'a str,
    pub company: &'a str,
    pub contact: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub source_url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub salary: Option<&'a str>,
    pub status: &'a str,
    pub date_applied: NaiveDate,
}

/// Changeset struct for rewriting a record after a merge.
///
/// The merge happens in the domain, so `None` here means "store NULL", not
/// "leave the column alone".
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = job_applications)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ApplicationUpdate<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub contact: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub source_url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub salary: Option<&'a str>,
    pub status: &'a str,
    pub date_applied: NaiveDate,
}
