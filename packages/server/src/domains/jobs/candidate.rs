//! Candidate records and validation.
//!
//! Callers hand the store best-effort, stringly-typed candidates: the
//! scraper's extracted fields or an API create body. Validation produces
//! the typed [`NewJob`] that the insert paths accept, so no unvalidated
//! record can reach the table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::JobError;
use super::models::{Job, JobType};
use super::upsert::canonical_url;

/// A candidate job posting as it arrives from a caller.
///
/// All fields are optional at the serde layer; `validate` enforces the
/// required ones and reports everything missing in a single error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub posting_date: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub job_url: String,
}

/// A validated, canonical job record ready for insertion.
#[derive(Debug, Clone)]
pub struct NewJob {
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

impl JobCandidate {
    /// Validate and canonicalize this candidate.
    ///
    /// Requires non-empty title, company, job_url, and posting_date;
    /// posting_date must be `YYYY-MM-DD`; job_type must be a known label
    /// or empty. Tags are normalized, job_url canonicalized.
    pub fn validate(&self) -> Result<NewJob, JobError> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("company", &self.company),
            ("job_url", &self.job_url),
            ("posting_date", &self.posting_date),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
        if !missing.is_empty() {
            return Err(JobError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(NewJob {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            // Stored as given; never derived from city/country.
            location: self.location.trim().to_string(),
            posting_date: parse_posting_date(&self.posting_date)?,
            job_type: parse_job_type(&self.job_type)?,
            tags: normalize_tags(&self.tags),
            job_url: canonical_url(&self.job_url),
        })
    }
}

/// A partial update to an existing job. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub posting_date: Option<String>,
    pub job_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub job_url: Option<String>,
}

impl JobPatch {
    /// Apply this patch to a job in memory, validating each present field.
    pub fn apply(&self, job: &mut Job) -> Result<(), JobError> {
        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(JobError::Validation("title must not be empty".into()));
            }
            job.title = title.to_string();
        }
        if let Some(company) = &self.company {
            let company = company.trim();
            if company.is_empty() {
                return Err(JobError::Validation("company must not be empty".into()));
            }
            job.company = company.to_string();
        }
        if let Some(city) = &self.city {
            job.city = city.trim().to_string();
        }
        if let Some(country) = &self.country {
            job.country = country.trim().to_string();
        }
        if let Some(location) = &self.location {
            job.location = location.trim().to_string();
        }
        if let Some(date) = &self.posting_date {
            job.posting_date = parse_posting_date(date)?;
        }
        if let Some(job_type) = &self.job_type {
            job.job_type = parse_job_type(job_type)?;
        }
        if let Some(tags) = &self.tags {
            job.tags = normalize_tags(tags);
        }
        if let Some(url) = &self.job_url {
            let url = canonical_url(url);
            if url.is_empty() {
                return Err(JobError::Validation("job_url must not be empty".into()));
            }
            job.job_url = url;
        }
        Ok(())
    }
}

fn parse_posting_date(value: &str) -> Result<NaiveDate, JobError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| JobError::Validation("posting_date must be YYYY-MM-DD".into()))
}

/// Empty stays empty; anything else must be a known label, stored in its
/// canonical spelling.
fn parse_job_type(value: &str) -> Result<String, JobError> {
    let value = value.trim();
    if value.is_empty() {
        Ok(String::new())
    } else {
        Ok(JobType::from_str(value)?.to_string())
    }
}

/// Trim, drop empties, and collapse case-insensitive duplicates keeping
/// the first spelling.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_lowercase()) {
            out.push(tag.to_string());
        }
    }
    out
}
