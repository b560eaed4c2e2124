//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"demo@example.com","name":"Demo","password":"demo123"}
//! POST /api/v1/login    {"email":"demo@example.com","password":"demo123"}
//! POST /api/v1/logout
//! GET  /api/v1/session
//! ```
//!
//! Registration signs the new account in immediately, so a client never
//! needs a follow-up login call.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Credentials, Registration, Session};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Requested login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Raw secret, at least six characters.
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Raw secret.
    pub password: String,
}

/// Create an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = Session,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::domain::DomainError),
        (status = 409, description = "Email already registered", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        name,
        password,
    } = payload.into_inner();
    let current = state
        .auth
        .register(Registration {
            email,
            name,
            password,
        })
        .await?;
    session.persist(&current)?;
    Ok(HttpResponse::Created().json(current))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Session,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let current = state.auth.login(Credentials { email, password }).await?;
    session.persist(&current)?;
    Ok(HttpResponse::Ok().json(current))
}

/// Destroy the current session.
///
/// Always succeeds, signed in or not, so logout is safely repeatable.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session destroyed")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Report the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = Session),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<Session>> {
    Ok(web::Json(session.require()?))
}
