//! Persistence adapters for the domain's repository ports.
//!
//! Two backends are provided: a PostgreSQL adapter built on Diesel with
//! async connection pooling, and a single-file JSON store for small
//! deployments that do not want to run a database. Which one backs the
//! running server is a configuration choice; the domain only ever sees the
//! port traits.

pub mod diesel_account_repository;
pub mod diesel_application_repository;
pub mod json_store;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_application_repository::DieselApplicationRepository;
pub use json_store::{JsonStore, JsonStoreError};
pub use pool::{DbPool, PoolConfig, PoolError};
