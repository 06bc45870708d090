use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::domains::jobs::Job;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    ok: bool,
    db_rows: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Proves database connectivity by counting stored jobs. Returns 200 OK
/// when the query succeeds, 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match Job::count_all(&state.db_pool).await {
        Ok(count) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                db_rows: count,
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                ok: false,
                db_rows: 0,
                error: Some(e.to_string()),
            }),
        ),
    }
}
