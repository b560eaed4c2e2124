//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::{ApplicationsService, AuthService};
use crate::domain::ports::{FixtureAccountRepository, FixtureApplicationRepository};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state over fresh in-memory fixtures.
pub fn fixture_state() -> HttpState {
    HttpState::new(
        Arc::new(AuthService::new(Arc::new(FixtureAccountRepository::default()))),
        Arc::new(ApplicationsService::new(
            Arc::new(FixtureApplicationRepository::default()),
            Arc::new(DefaultClock),
        )),
    )
}
