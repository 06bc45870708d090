//! Posting-date parsing for scraped listings.
//!
//! Sites mix explicit dates ("19-Oct-2025", "May 1, 2025") with relative
//! phrases ("3 days ago"). Both resolve to a plain calendar date; the
//! caller decides what to do when nothing parses.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RELATIVE_RE: Regex =
        Regex::new(r"(?i)(\d+)\s+(minute|hour|day|week|month|year)s?\s+ago")
            .expect("relative date regex");
}

/// Explicit formats seen in the wild. `%b` accepts both abbreviated and
/// full month names when parsing.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%b %d, %Y", "%d %b %Y"];

/// Parse a posting-date string against a fixed `now`.
///
/// Relative months and years are approximated as 30 and 365 days, which
/// is plenty for ordering job listings.
pub fn parse_posting_date(text: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(captures) = RELATIVE_RE.captures(text) {
        let amount: i64 = captures[1].parse().ok()?;
        let delta = match captures[2].to_lowercase().as_str() {
            "minute" => Duration::minutes(amount),
            "hour" => Duration::hours(amount),
            "day" => Duration::days(amount),
            "week" => Duration::weeks(amount),
            "month" => Duration::days(30 * amount),
            "year" => Duration::days(365 * amount),
            _ => return None,
        };
        return Some((now - delta).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
