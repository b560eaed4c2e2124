//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed database schema exactly. They
//! are used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` carries a unique index; the stored value is lowercased by the
    /// domain before it reaches this table.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email, lowercased.
        email -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Argon2id credential hash in PHC string format.
        password_hash -> Text,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked job applications, one row per record.
    job_applications (id) {
        /// Primary key: BIGSERIAL, monotonically assigned.
        id -> Int8,
        /// Owning account.
        account_id -> Uuid,
        /// Role applied for.
        title -> Varchar,
        /// Target company.
        company -> Varchar,
        /// Contact person, if known.
        contact -> Nullable<Varchar>,
        /// Contact email, if known.
        contact_email -> Nullable<Varchar>,
        /// Link to the job posting.
        source_url -> Nullable<Text>,
        /// Free-text notes.
        notes -> Nullable<Text>,
        /// Salary text as entered.
        salary -> Nullable<Varchar>,
        /// Lifecycle stage label.
        status -> Varchar,
        /// Calendar date the application was sent.
        date_applied -> Date,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(job_applications -> accounts (account_id));
diesel::allow_tables_to_appear_in_same_query!(accounts, job_applications);
