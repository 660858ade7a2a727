//! Send mail handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    domain::submissions::{Submission, SubmissionService},
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send mail request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailBody {
    /// Accepted for compatibility and ignored. Submissions always go to the
    /// configured target mailbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "support@example.com")]
    pub target_email: Option<String>,

    /// The subject of the notification
    #[schema(example = "New Join Us Lead")]
    pub subject: String,

    /// The form the submission came from
    #[schema(example = "Join Us")]
    pub source: String,

    /// The submitted fields, rendered in the order given
    #[schema(value_type = Object, example = json!({"name": "Arjun Sharma", "phone": "9988776655"}))]
    pub form_data: Map<String, Value>,
}

/// Send mail response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailResponse {
    /// Whether the relay accepted the notification
    pub success: bool,
}

/// Relay a form submission to the target mailbox
#[utoipa::path(
    post,
    operation_id = "send_mail",
    tag = "Submissions",
    path = "/api/send-mail",
    request_body = SendMailBody,
    responses(
        (status = 200, description = "Send attempt finished", body = SendMailResponse, example = json!({"success": true})),
        (status = 422, description = "Unprocessable entity", body = ErrorResponse),
    )
)]
pub async fn handler<S: SubmissionService>(
    State(state): State<AppState<S>>,
    request: Result<Json<SendMailBody>, JsonRejection>,
) -> Result<Json<SendMailResponse>, ApiError> {
    let Json(body) = request?;

    if let Some(requested) = &body.target_email {
        debug!(%requested, "ignoring requested target email");
    }

    let submission = Submission::from_json(&body.source, &body.subject, body.form_data);

    let success = state
        .submissions
        .relay_submission(&submission)
        .await
        .is_ok();

    Ok(Json(SendMailResponse { success }))
}
