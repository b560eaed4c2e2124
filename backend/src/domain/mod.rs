//! Domain primitives, services, and ports.
//!
//! Purpose: Define the strongly typed model of the tracker (accounts,
//! sessions, job applications, the lifecycle stages, and the flow
//! aggregation) plus the use-case services over it. Keep types immutable
//! and document invariants and serialisation contracts (serde) in each
//! type's Rustdoc. Nothing in this module knows about HTTP or storage;
//! adapters plug in through [`ports`].

pub mod account;
pub mod application;
pub mod applications_service;
pub mod auth_service;
pub mod error;
pub mod flow;
pub mod lifecycle;
pub mod password;
pub mod ports;
pub mod session;

pub use self::account::{
    Account, AccountId, AccountName, AccountValidationError, Email, NewAccount, PASSWORD_MIN_LEN,
};
pub use self::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, ApplicationValidationError, CompanyName,
    JobApplication, JobTitle,
};
pub use self::applications_service::{ApplicationsService, CreateApplication};
pub use self::auth_service::{AuthService, Credentials, Registration};
pub use self::error::{DomainError, DomainError as Error, ErrorCode};
pub use self::flow::{FlowGraph, FlowLink, FlowNode, FlowStage, LinkTint, flow_graph};
pub use self::lifecycle::LifecycleStatus;
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::session::Session;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
