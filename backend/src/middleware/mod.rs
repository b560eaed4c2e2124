//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such
//! as request identification and access logging.

pub mod request_log;

pub use request_log::RequestLog;
