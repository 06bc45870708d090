//! REST handlers for the jobs resource.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::common::{Page, PageParams};
use crate::domains::jobs::{
    query, upsert, DuplicatePolicy, Job, JobCandidate, JobError, JobFilter, JobPatch, SortOrder,
    UpsertOutcome,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// List jobs with filtering, sorting, and pagination.
///
/// Query parameters: `q`, `job_type`, `city`, `country`, `location`,
/// repeated `tag`, `tag_mode` (any|all), `sort`, `page`, `page_size`.
/// Parameters arrive as raw pairs so `tag` may repeat.
pub async fn list_jobs(
    Extension(state): Extension<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<Job>>, ApiError> {
    let (filter, sort, params) = parse_list_params(pairs)?;
    let page = query::search(&filter, sort, params, &state.db_pool).await?;
    Ok(Json(page))
}

/// Fetch a single job by id.
pub async fn get_job(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Job>, ApiError> {
    let job = Job::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(JobError::NotFound(id))?;
    Ok(Json(job))
}

/// Create a job. 201 on success, 409 when the canonical URL exists.
pub async fn create_job(
    Extension(state): Extension<AppState>,
    Json(mut candidate): Json<JobCandidate>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    // The create path defaults the employment type; the scraper path
    // supplies its own guess.
    if candidate.job_type.trim().is_empty() {
        candidate.job_type = "Full-time".to_string();
    }

    let job = match upsert(&candidate, DuplicatePolicy::Reject, &state.db_pool).await? {
        UpsertOutcome::Created(job) => job,
        // Reject policy reports duplicates as an error, never a skip.
        UpsertOutcome::SkippedDuplicate => {
            return Err(JobError::DuplicateUrl(candidate.job_url.clone()).into())
        }
    };
    Ok((StatusCode::CREATED, Json(job)))
}

/// Partially or fully update a job. `job_url` is mutable; a collision
/// with another row is a conflict.
pub async fn update_job(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, ApiError> {
    let mut job = Job::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(JobError::NotFound(id))?;
    patch.apply(&mut job)?;
    let job = job.save(&state.db_pool).await?;
    Ok(Json(job))
}

/// Delete a job by id.
pub async fn delete_job(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !Job::delete(id, &state.db_pool).await? {
        return Err(JobError::NotFound(id).into());
    }
    Ok(Json(json!({ "ok": true })))
}

/// Assemble the filter/sort/pagination triple from raw query pairs.
///
/// Unknown keys are ignored. Unknown `sort`, `tag_mode`, or `job_type`
/// values are validation errors; malformed integers fall back to the
/// defaults and out-of-range pagination clamps.
fn parse_list_params(
    pairs: Vec<(String, String)>,
) -> Result<(JobFilter, SortOrder, PageParams), JobError> {
    let mut filter = JobFilter::default();
    let mut sort = SortOrder::default();
    let mut page = None;
    let mut page_size = None;

    for (key, value) in pairs {
        match key.as_str() {
            "q" => filter.text_query = Some(value),
            "job_type" => {
                if !value.trim().is_empty() {
                    filter.job_type = Some(value.parse()?);
                }
            }
            "city" => filter.city = Some(value),
            "country" => filter.country = Some(value),
            "location" => filter.location = Some(value),
            "tag" => filter.tags.push(value),
            "tag_mode" => {
                if !value.trim().is_empty() {
                    filter.tag_mode = value.parse()?;
                }
            }
            "sort" => {
                if !value.trim().is_empty() {
                    sort = value.parse()?;
                }
            }
            "page" => page = value.trim().parse::<i64>().ok(),
            "page_size" => page_size = value.trim().parse::<i64>().ok(),
            _ => {}
        }
    }

    Ok((filter, sort, PageParams::clamped(page, page_size)))
}
