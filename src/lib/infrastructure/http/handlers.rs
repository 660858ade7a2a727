//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

use super::errors::ErrorResponse;

pub mod send_mail;
pub mod uptime;

/// Logs a handler panic and returns a generic 500 error
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };

    error!(panic = details, "request handler panicked");

    let error = ErrorResponse {
        error: "Internal server error".to_string(),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}
