//! Backend library modules for the job application tracker.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Access-log middleware applied to every request.
pub use middleware::RequestLog;
