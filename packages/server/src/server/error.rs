//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domains::jobs::JobError;

/// Wrapper that renders a [`JobError`] as the API's error envelope:
/// `{ "error": <kind>, "message": <text> }`.
pub struct ApiError(JobError);

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self.0 {
            JobError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "validation_error", self.0.to_string())
            }
            JobError::DuplicateUrl(_) => (StatusCode::CONFLICT, "conflict", self.0.to_string()),
            JobError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.0.to_string()),
            JobError::Database(e) => {
                // Internals stay out of the response body.
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}
