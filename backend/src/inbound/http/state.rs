//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{ApplicationsService, AuthService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup and login use-cases.
    pub auth: Arc<AuthService>,
    /// Application CRUD and flow aggregation use-cases.
    pub applications: Arc<ApplicationsService>,
}

impl HttpState {
    /// Bundle the domain services for handler injection.
    pub fn new(auth: Arc<AuthService>, applications: Arc<ApplicationsService>) -> Self {
        Self { auth, applications }
    }
}
