//! Job-application API handlers.
//!
//! ```text
//! GET    /api/v1/applications
//! POST   /api/v1/applications
//! PUT    /api/v1/applications/{id}
//! PATCH  /api/v1/applications/{id}/status
//! DELETE /api/v1/applications/{id}
//! GET    /api/v1/applications/flow
//! ```
//!
//! All routes require a session; records are scoped to the signed-in
//! account throughout.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::domain::{
    ApplicationId, ApplicationPatch, ApplicationValidationError, CompanyName, CreateApplication,
    Error, FlowGraph, JobApplication, JobTitle, LifecycleStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One tracked application as returned to clients.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    /// Store-assigned identifier.
    pub id: i64,
    /// Role applied for.
    pub title: String,
    /// Target company.
    pub company: String,
    /// Contact person, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Contact email, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Link to the job posting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Salary text as entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    /// Current lifecycle stage.
    pub status: LifecycleStatus,
    /// Calendar date the application was sent.
    pub date_applied: NaiveDate,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<JobApplication> for ApplicationResponse {
    fn from(record: JobApplication) -> Self {
        Self {
            id: record.id.as_i64(),
            title: record.title.into(),
            company: record.company.into(),
            contact: record.contact,
            contact_email: record.contact_email,
            source_url: record.source_url,
            notes: record.notes,
            salary: record.salary,
            status: record.status,
            date_applied: record.date_applied,
            created_at: record.created_at,
        }
    }
}

/// Creation request body for `POST /api/v1/applications`.
///
/// Only `title` and `company` are required; `status` defaults to `Applied`
/// and `dateApplied` to today.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    /// Role applied for.
    pub title: String,
    /// Target company.
    pub company: String,
    /// Contact person.
    #[serde(default)]
    pub contact: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Link to the job posting.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Salary text, stored as entered.
    #[serde(default)]
    pub salary: Option<String>,
    /// Initial lifecycle stage.
    #[serde(default)]
    pub status: Option<LifecycleStatus>,
    /// Application date.
    #[serde(default)]
    pub date_applied: Option<NaiveDate>,
}

/// Deserialise a field that distinguishes "absent" from "explicitly null".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Update request body for `PUT /api/v1/applications/{id}`.
///
/// Absent fields keep their stored values. For the optional text fields an
/// explicit `null` clears the stored value, while leaving the key out keeps
/// it.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement company.
    #[serde(default)]
    pub company: Option<String>,
    /// Replacement contact; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact: Option<Option<String>>,
    /// Replacement contact email; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_email: Option<Option<String>>,
    /// Replacement posting link; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub source_url: Option<Option<String>>,
    /// Replacement notes; `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    /// Replacement salary text; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub salary: Option<Option<String>>,
    /// Replacement lifecycle stage.
    #[serde(default)]
    pub status: Option<LifecycleStatus>,
    /// Replacement application date.
    #[serde(default)]
    pub date_applied: Option<NaiveDate>,
}

/// Status change body for `PATCH /api/v1/applications/{id}/status`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusRequest {
    /// Stage to reclassify the record into.
    pub status: LifecycleStatus,
}

fn map_validation_error(err: ApplicationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

/// List the account's applications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    responses(
        (status = 200, description = "Applications", body = [ApplicationResponse]),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ApplicationResponse>>> {
    let account = session.require_account()?;
    let records = state.applications.list(account).await?;
    Ok(web::Json(
        records.into_iter().map(ApplicationResponse::from).collect(),
    ))
}

/// Track a new application.
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application created", body = ApplicationResponse),
        (status = 400, description = "Invalid request", body = crate::domain::DomainError),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError)
    ),
    tags = ["applications"],
    operation_id = "createApplication"
)]
#[post("/applications")]
pub async fn create_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateApplicationRequest>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let payload = payload.into_inner();
    let input = CreateApplication {
        title: JobTitle::new(payload.title).map_err(map_validation_error)?,
        company: CompanyName::new(payload.company).map_err(map_validation_error)?,
        contact: payload.contact,
        contact_email: payload.contact_email,
        source_url: payload.source_url,
        notes: payload.notes,
        salary: payload.salary,
        status: payload.status,
        date_applied: payload.date_applied,
    };
    let record = state.applications.create(account, input).await?;
    Ok(HttpResponse::Created().json(ApplicationResponse::from(record)))
}

/// Update an existing application.
#[utoipa::path(
    put,
    path = "/api/v1/applications/{id}",
    request_body = UpdateApplicationRequest,
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Updated application", body = ApplicationResponse),
        (status = 400, description = "Invalid request", body = crate::domain::DomainError),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError),
        (status = 404, description = "No such application", body = crate::domain::DomainError)
    ),
    tags = ["applications"],
    operation_id = "updateApplication"
)]
#[put("/applications/{id}")]
pub async fn update_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
    payload: web::Json<UpdateApplicationRequest>,
) -> ApiResult<web::Json<ApplicationResponse>> {
    let account = session.require_account()?;
    let payload = payload.into_inner();
    let patch = ApplicationPatch {
        title: payload
            .title
            .map(JobTitle::new)
            .transpose()
            .map_err(map_validation_error)?,
        company: payload
            .company
            .map(CompanyName::new)
            .transpose()
            .map_err(map_validation_error)?,
        contact: payload.contact,
        contact_email: payload.contact_email,
        source_url: payload.source_url,
        notes: payload.notes,
        salary: payload.salary,
        status: payload.status,
        date_applied: payload.date_applied,
    };
    let record = state
        .applications
        .update(account, ApplicationId::new(id.into_inner()), patch)
        .await?;
    Ok(web::Json(ApplicationResponse::from(record)))
}

/// Reclassify an application's lifecycle stage.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/status",
    request_body = StatusRequest,
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Updated application", body = ApplicationResponse),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError),
        (status = 404, description = "No such application", body = crate::domain::DomainError)
    ),
    tags = ["applications"],
    operation_id = "setApplicationStatus"
)]
#[patch("/applications/{id}/status")]
pub async fn set_application_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<ApplicationResponse>> {
    let account = session.require_account()?;
    let record = state
        .applications
        .set_status(
            account,
            ApplicationId::new(id.into_inner()),
            payload.into_inner().status,
        )
        .await?;
    Ok(web::Json(ApplicationResponse::from(record)))
}

/// Delete an application permanently.
#[utoipa::path(
    delete,
    path = "/api/v1/applications/{id}",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError),
        (status = 404, description = "No such application", body = crate::domain::DomainError)
    ),
    tags = ["applications"],
    operation_id = "deleteApplication"
)]
#[delete("/applications/{id}")]
pub async fn delete_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    state
        .applications
        .delete(account, ApplicationId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Aggregate the account's applications into the outcome diagram.
///
/// An account with no records gets `204 No Content`: there is nothing to
/// draw, and clients should not be handed a degenerate graph.
#[utoipa::path(
    get,
    path = "/api/v1/applications/flow",
    responses(
        (status = 200, description = "Aggregated outcome diagram", body = FlowGraph),
        (status = 204, description = "No applications to aggregate"),
        (status = 401, description = "Not signed in", body = crate::domain::DomainError)
    ),
    tags = ["applications"],
    operation_id = "applicationFlow"
)]
#[get("/applications/flow")]
pub async fn application_flow(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    match state.applications.flow(account).await? {
        Some(graph) => Ok(HttpResponse::Ok().json(graph)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::auth::RegisterRequest;
    use crate::inbound::http::test_utils::{fixture_state, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(fixture_state()))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(crate::inbound::http::auth::register)
                    .service(application_flow)
                    .service(list_applications)
                    .service(create_application)
                    .service(update_application)
                    .service(set_application_status)
                    .service(delete_application),
            )
    }

    async fn sign_up(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        email: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(RegisterRequest {
                    email: email.into(),
                    name: "Demo".into(),
                    password: "demo123".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    async fn create(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
        body: Value,
    ) -> Value {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/applications")
                .cookie(cookie.clone())
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        actix_test::read_body_json(response).await
    }

    #[actix_web::test]
    async fn create_defaults_status_and_date() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_up(&app, "demo@example.com").await;
        let created = create(
            &app,
            &cookie,
            json!({ "title": "Engineer", "company": "Acme" }),
        )
        .await;
        assert_eq!(created["status"], "Applied");
        assert!(created["dateApplied"].is_string());
        assert!(created["id"].is_i64());
        // Optional fields are omitted, not null.
        assert!(created.get("notes").is_none());
    }

    #[actix_web::test]
    async fn create_rejects_blank_title() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_up(&app, "demo@example.com").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/applications")
                .cookie(cookie)
                .set_json(json!({ "title": "  ", "company": "Acme" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "title");
    }

    #[actix_web::test]
    async fn list_is_scoped_to_the_signed_in_account() {
        let app = actix_test::init_service(test_app()).await;
        let mine = sign_up(&app, "mine@example.com").await;
        let theirs = sign_up(&app, "theirs@example.com").await;
        create(&app, &mine, json!({ "title": "Engineer", "company": "Acme" })).await;
        create(
            &app,
            &theirs,
            json!({ "title": "Analyst", "company": "Beta" }),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/applications")
                .cookie(mine)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let records = body.as_array().expect("array");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["company"], "Acme");
    }

    #[actix_web::test]
    async fn update_merges_and_null_clears() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_up(&app, "demo@example.com").await;
        let created = create(
            &app,
            &cookie,
            json!({ "title": "Engineer", "company": "Acme", "notes": "referral" }),
        )
        .await;
        let id = created["id"].as_i64().expect("id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/applications/{id}"))
                .cookie(cookie)
                .set_json(json!({ "title": "Staff Engineer", "notes": null }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["title"], "Staff Engineer");
        assert_eq!(body["company"], "Acme");
        assert!(body.get("notes").is_none());
    }

    #[actix_web::test]
    async fn status_patch_reclassifies_freely() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_up(&app, "demo@example.com").await;
        let created = create(
            &app,
            &cookie,
            json!({ "title": "Engineer", "company": "Acme" }),
        )
        .await;
        let id = created["id"].as_i64().expect("id");

        // Any stage may follow any other, including moving backwards.
        for status in ["Accepted", "Applied", "Rejected"] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::patch()
                    .uri(&format!("/api/v1/applications/{id}/status"))
                    .cookie(cookie.clone())
                    .set_json(json!({ "status": status }))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = actix_test::read_body_json(response).await;
            assert_eq!(body["status"], status);
        }
    }

    #[actix_web::test]
    async fn cross_account_access_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let owner = sign_up(&app, "owner@example.com").await;
        let intruder = sign_up(&app, "intruder@example.com").await;
        let created = create(
            &app,
            &owner,
            json!({ "title": "Engineer", "company": "Acme" }),
        )
        .await;
        let id = created["id"].as_i64().expect("id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/applications/{id}"))
                .cookie(intruder)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_removes_the_record() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_up(&app, "demo@example.com").await;
        let created = create(
            &app,
            &cookie,
            json!({ "title": "Engineer", "company": "Acme" }),
        )
        .await;
        let id = created["id"].as_i64().expect("id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/applications/{id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/applications")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.as_array().expect("array").is_empty());
    }

    #[actix_web::test]
    async fn flow_is_empty_then_populated() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_up(&app, "demo@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/applications/flow")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        create(
            &app,
            &cookie,
            json!({ "title": "Engineer", "company": "Acme", "status": "Offer" }),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/applications/flow")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let nodes = body["nodes"].as_array().expect("nodes");
        assert_eq!(nodes.len(), 8);
        let links = body["links"].as_array().expect("links");
        assert!(
            links
                .iter()
                .any(|l| l["source"] == "Interviews" && l["target"] == "Offers")
        );
    }

    #[actix_web::test]
    async fn every_route_requires_a_session() {
        let app = actix_test::init_service(test_app()).await;
        let requests = [
            actix_test::TestRequest::get().uri("/api/v1/applications"),
            actix_test::TestRequest::post()
                .uri("/api/v1/applications")
                .set_json(json!({ "title": "Engineer", "company": "Acme" })),
            actix_test::TestRequest::put()
                .uri("/api/v1/applications/1")
                .set_json(json!({})),
            actix_test::TestRequest::patch()
                .uri("/api/v1/applications/1/status")
                .set_json(json!({ "status": "Offer" })),
            actix_test::TestRequest::delete().uri("/api/v1/applications/1"),
            actix_test::TestRequest::get().uri("/api/v1/applications/flow"),
        ];
        for request in requests {
            let response = actix_test::call_service(&app, request.to_request()).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
