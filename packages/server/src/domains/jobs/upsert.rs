//! Insert-or-skip/reject keyed by canonical URL.
//!
//! Both producers route their writes through here: the scraper with
//! [`DuplicatePolicy::SkipExisting`] (re-running ingestion never mutates
//! existing rows), the create endpoint with [`DuplicatePolicy::Reject`]
//! (duplicates surface as a conflict). The uniqueness check and the insert
//! happen inside a single statement, so concurrent writers serialize on
//! the table constraint rather than racing a read-then-write.

use sqlx::PgPool;

use super::candidate::JobCandidate;
use super::error::JobError;
use super::models::Job;

/// What to do when the candidate's canonical URL already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the existing row unchanged (ingestion path)
    SkipExisting,
    /// Report a conflict to the caller (API create path)
    Reject,
}

/// Result of a successful upsert call.
#[derive(Debug)]
pub enum UpsertOutcome {
    Created(Job),
    SkippedDuplicate,
}

/// Canonical form of a job URL: trimmed, with `https://` prefixed when no
/// scheme is present. Two records with the same canonical URL are the same
/// posting regardless of any other field.
pub fn canonical_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }
    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Reconcile a candidate against the store.
pub async fn upsert(
    candidate: &JobCandidate,
    policy: DuplicatePolicy,
    pool: &PgPool,
) -> Result<UpsertOutcome, JobError> {
    let new = candidate.validate()?;

    match policy {
        DuplicatePolicy::SkipExisting => match Job::insert_skip_duplicate(&new, pool).await? {
            Some(job) => Ok(UpsertOutcome::Created(job)),
            None => {
                tracing::info!(job_url = %new.job_url, "skipping duplicate job");
                Ok(UpsertOutcome::SkippedDuplicate)
            }
        },
        DuplicatePolicy::Reject => {
            let job = Job::insert(&new, pool).await?;
            Ok(UpsertOutcome::Created(job))
        }
    }
}
