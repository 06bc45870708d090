//! Deterministic filter/sort/paginate over the jobs table.
//!
//! All present predicates AND together; an absent or empty filter field is
//! "no constraint", never "match empty". Every sort ends in an `id`
//! tiebreaker so identical inputs against an unchanged table always return
//! identical pages.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::common::{Page, PageParams};

use super::candidate::normalize_tags;
use super::error::JobError;
use super::models::{Job, JobType};

/// How a multi-tag filter combines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagMode {
    /// Row matches if it has at least one requested tag
    #[default]
    Any,
    /// Row must have every requested tag
    All,
}

impl std::str::FromStr for TagMode {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, JobError> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(TagMode::Any),
            "all" => Ok(TagMode::All),
            other => Err(JobError::Validation(format!(
                "Unsupported tag_mode '{other}'. Allowed: any, all"
            ))),
        }
    }
}

/// Result ordering. Unknown values are rejected, never defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    CompanyAsc,
}

impl SortOrder {
    fn order_by_sql(&self) -> &'static str {
        // Newest insert wins date ties; alphabetical sorts keep insertion
        // order within a tie.
        match self {
            SortOrder::DateDesc => " ORDER BY posting_date DESC, id DESC",
            SortOrder::DateAsc => " ORDER BY posting_date ASC, id DESC",
            SortOrder::TitleAsc => " ORDER BY LOWER(title) ASC, id ASC",
            SortOrder::CompanyAsc => " ORDER BY LOWER(company) ASC, id ASC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, JobError> {
        match s {
            "date_desc" => Ok(SortOrder::DateDesc),
            "date_asc" => Ok(SortOrder::DateAsc),
            "title_asc" => Ok(SortOrder::TitleAsc),
            "company_asc" => Ok(SortOrder::CompanyAsc),
            other => Err(JobError::Validation(format!(
                "Unsupported sort '{other}'. Allowed: company_asc, date_asc, date_desc, title_asc"
            ))),
        }
    }
}

/// Filter predicates for a job listing query. `Default` is "match all".
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring over title OR company
    pub text_query: Option<String>,
    /// Exact employment-type match
    pub job_type: Option<JobType>,
    /// Case-insensitive exact match
    pub city: Option<String>,
    /// Case-insensitive exact match
    pub country: Option<String>,
    /// Case-insensitive substring match
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub tag_mode: TagMode,
}

impl JobFilter {
    /// Trim string predicates, drop the empty ones, and normalize the
    /// requested tag set. Run once per query so the count and the page
    /// see identical predicates.
    fn normalized(&self) -> JobFilter {
        JobFilter {
            text_query: non_empty(self.text_query.as_deref()),
            job_type: self.job_type,
            city: non_empty(self.city.as_deref()),
            country: non_empty(self.country.as_deref()),
            location: non_empty(self.location.as_deref()),
            tags: normalize_tags(&self.tags),
            tag_mode: self.tag_mode,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Select one page of jobs matching `filter`, ordered by `sort`.
///
/// The returned envelope carries the pre-pagination total and echoes the
/// effective pagination values.
pub async fn search(
    filter: &JobFilter,
    sort: SortOrder,
    params: PageParams,
    pool: &PgPool,
) -> Result<Page<Job>, JobError> {
    let filter = filter.normalized();

    let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
    push_predicates(&mut count_query, &filter);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut select_query = QueryBuilder::new("SELECT * FROM jobs");
    push_predicates(&mut select_query, &filter);
    select_query.push(sort.order_by_sql());
    select_query.push(" LIMIT ");
    select_query.push_bind(params.page_size);
    select_query.push(" OFFSET ");
    select_query.push_bind(params.offset());

    let items = select_query
        .build_query_as::<Job>()
        .fetch_all(pool)
        .await?;

    Ok(Page {
        page: params.page,
        page_size: params.page_size,
        total,
        items,
    })
}

fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    query.push(" WHERE TRUE");

    if let Some(text) = &filter.text_query {
        let pattern = format!("%{text}%");
        query.push(" AND (title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR company ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(job_type) = filter.job_type {
        query.push(" AND job_type = ");
        query.push_bind(job_type.to_string());
    }
    if let Some(city) = &filter.city {
        query.push(" AND LOWER(city) = LOWER(");
        query.push_bind(city.clone());
        query.push(")");
    }
    if let Some(country) = &filter.country {
        query.push(" AND LOWER(country) = LOWER(");
        query.push_bind(country.clone());
        query.push(")");
    }
    if let Some(location) = &filter.location {
        query.push(" AND location ILIKE ");
        query.push_bind(format!("%{location}%"));
    }
    if !filter.tags.is_empty() {
        match filter.tag_mode {
            TagMode::Any => query.push(" AND tags && "),
            TagMode::All => query.push(" AND tags @> "),
        };
        query.push_bind(filter.tags.clone());
    }
}
