//! Test fixtures for creating job rows.
//!
//! Fixtures go through the same upsert path production writes use.

use anyhow::{anyhow, Result};
use server_core::domains::jobs::{upsert, DuplicatePolicy, Job, JobCandidate, UpsertOutcome};
use sqlx::PgPool;

/// A minimal valid candidate; override fields as the test needs.
pub fn candidate(title: &str, job_url: &str) -> JobCandidate {
    JobCandidate {
        title: title.to_string(),
        company: "Acme Re".to_string(),
        posting_date: "2025-06-01".to_string(),
        job_url: job_url.to_string(),
        ..Default::default()
    }
}

/// Insert a candidate and return the stored row.
pub async fn insert_job(pool: &PgPool, c: &JobCandidate) -> Result<Job> {
    match upsert(c, DuplicatePolicy::Reject, pool).await? {
        UpsertOutcome::Created(job) => Ok(job),
        UpsertOutcome::SkippedDuplicate => Err(anyhow!("fixture unexpectedly skipped")),
    }
}

/// Insert a dated, tagged candidate in one call.
pub async fn insert_dated_job(
    pool: &PgPool,
    title: &str,
    company: &str,
    posting_date: &str,
    tags: &[&str],
    job_url: &str,
) -> Result<Job> {
    let c = JobCandidate {
        title: title.to_string(),
        company: company.to_string(),
        posting_date: posting_date.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        job_url: job_url.to_string(),
        ..Default::default()
    };
    insert_job(pool, &c).await
}
