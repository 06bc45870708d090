use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::super::candidate::NewJob;
use super::super::error::JobError;

/// A stored job posting.
///
/// `job_url` is always the canonical form (trimmed, scheme-defaulted) and
/// is unique across the table. `job_type` is one of the [`JobType`] labels
/// or empty when unspecified. `tags` are trimmed and de-duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub city: String,
    pub country: String,
    pub location: String,
    pub posting_date: NaiveDate,
    pub job_type: String,
    pub tags: Vec<String>,
    pub job_url: String,
}

/// Employment type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::FullTime => write!(f, "Full-time"),
            JobType::PartTime => write!(f, "Part-time"),
            JobType::Contract => write!(f, "Contract"),
            JobType::Internship => write!(f, "Internship"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, JobError> {
        match s.trim().to_lowercase().as_str() {
            "full-time" | "full time" => Ok(JobType::FullTime),
            "part-time" | "part time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            other => Err(JobError::Validation(format!(
                "Invalid job_type '{other}'. Allowed: Full-time, Part-time, Contract, Internship"
            ))),
        }
    }
}

impl Job {
    /// Find a job by id
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>, JobError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(job)
    }

    /// Total number of stored jobs
    pub async fn count_all(pool: &PgPool) -> Result<i64, JobError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert a validated job, rejecting duplicate URLs.
    ///
    /// The UNIQUE constraint on job_url makes the check-and-insert atomic;
    /// a violation maps to [`JobError::DuplicateUrl`].
    pub async fn insert(new: &NewJob, pool: &PgPool) -> Result<Self, JobError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                title, company, city, country, location,
                posting_date, job_type, tags, job_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.company)
        .bind(&new.city)
        .bind(&new.country)
        .bind(&new.location)
        .bind(new.posting_date)
        .bind(&new.job_type)
        .bind(&new.tags)
        .bind(&new.job_url)
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, &new.job_url))?;
        Ok(job)
    }

    /// Insert a validated job, leaving any existing row with the same
    /// canonical URL untouched.
    ///
    /// Returns `None` when the URL already exists. `ON CONFLICT DO NOTHING`
    /// keeps concurrent ingestion runs from racing each other.
    pub async fn insert_skip_duplicate(
        new: &NewJob,
        pool: &PgPool,
    ) -> Result<Option<Self>, JobError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                title, company, city, country, location,
                posting_date, job_type, tags, job_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (job_url) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.company)
        .bind(&new.city)
        .bind(&new.country)
        .bind(&new.location)
        .bind(new.posting_date)
        .bind(&new.job_type)
        .bind(&new.tags)
        .bind(&new.job_url)
        .fetch_optional(pool)
        .await?;
        Ok(job)
    }

    /// Persist this row's mutable fields.
    ///
    /// Used by the update path after a [`JobPatch`](super::super::candidate::JobPatch)
    /// has been applied in memory. A changed job_url that collides maps to
    /// [`JobError::DuplicateUrl`].
    pub async fn save(&self, pool: &PgPool) -> Result<Self, JobError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                title = $2,
                company = $3,
                city = $4,
                country = $5,
                location = $6,
                posting_date = $7,
                job_type = $8,
                tags = $9,
                job_url = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.company)
        .bind(&self.city)
        .bind(&self.country)
        .bind(&self.location)
        .bind(self.posting_date)
        .bind(&self.job_type)
        .bind(&self.tags)
        .bind(&self.job_url)
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, &self.job_url))?;
        Ok(job)
    }

    /// Delete a job by id. Returns false when the id does not exist.
    pub async fn delete(id: i64, pool: &PgPool) -> Result<bool, JobError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_unique_violation(e: sqlx::Error, url: &str) -> JobError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            JobError::DuplicateUrl(url.to_string())
        }
        _ => JobError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn job_type_labels_round_trip() {
        for label in ["Full-time", "Part-time", "Contract", "Internship"] {
            let parsed = JobType::from_str(label).unwrap();
            assert_eq!(parsed.to_string(), label);
        }
    }

    #[test]
    fn job_type_parse_is_case_insensitive() {
        assert_eq!(JobType::from_str("FULL-TIME").unwrap(), JobType::FullTime);
        assert_eq!(JobType::from_str("part time").unwrap(), JobType::PartTime);
    }

    #[test]
    fn job_type_rejects_unknown_label() {
        assert!(JobType::from_str("freelance").is_err());
    }
}
