use thiserror::Error;

/// Errors surfaced by job store operations.
///
/// Every error is reported synchronously to the immediate caller; nothing
/// in this domain retries. A skipped ingestion duplicate is an
/// [`UpsertOutcome`](super::upsert::UpsertOutcome), not an error.
#[derive(Debug, Error)]
pub enum JobError {
    /// Missing or malformed field on create/update
    #[error("{0}")]
    Validation(String),

    /// A job with this canonical URL already exists
    #[error("job_url must be unique: {0}")]
    DuplicateUrl(String),

    /// Operation targeted an id that does not exist
    #[error("job {0} not found")]
    NotFound(i64),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
