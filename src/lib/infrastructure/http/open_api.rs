//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::*};

/// OpenAPI document for the HTTP API
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Form Relay"),
    paths(send_mail::handler, uptime::handler),
    components(schemas(
        send_mail::SendMailBody,
        send_mail::SendMailResponse,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
