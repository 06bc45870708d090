//! HTML extraction for listing and detail pages.
//!
//! Selectors are tried in cascades because the source markup is not
//! stable; every extractor degrades to "field absent" rather than failing
//! the page.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use server_core::domains::jobs::JobCandidate;
use std::collections::HashSet;
use url::Url;

use crate::dates;

/// Path fragment that marks a job detail link.
pub const JOB_LINK_FRAGMENT: &str = "/actuarial-jobs/";

/// Max tags kept per job.
pub const MAX_TAGS: usize = 6;

const COMPANY_SELECTORS: &[&str] = &[
    "h1 + div a",
    "h1 + p a",
    ".company a",
    ".company",
    "a[href*='company']",
];

const TAG_SELECTORS: &[&str] = &[
    ".tags a",
    ".tags span",
    ".chips a",
    ".chips span",
    "a.badge, span.badge",
];

// Chip-shaped elements that are really metadata, not tags.
const TAG_SKIP_PREFIXES: &[&str] = &[
    "posted",
    "job id",
    "country",
    "location",
    "working schedule",
    "work arrangement",
];

/// Collect job-detail links from a listing page, absolutized against
/// `base_url`, de-duplicated in document order.
pub fn listing_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let selector_str = format!(r#"a[href*="{JOB_LINK_FRAGMENT}"]"#);
    if let Ok(selector) = Selector::parse(&selector_str) {
        for element in document.select(&selector) {
            let href = element.value().attr("href").unwrap_or("");
            if let Some(absolute) = absolutize(href, base_url) {
                if absolute.contains(JOB_LINK_FRAGMENT) && seen.insert(absolute.clone()) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

fn absolutize(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let base = Url::parse(base_url).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

/// Extract a candidate record from a job detail page.
///
/// Returns `None` when the page lacks a usable title or company.
/// `now` anchors relative posting dates and the missing-date fallback.
pub fn job_from_detail(html: &str, url: &str, now: DateTime<Utc>) -> Option<JobCandidate> {
    let document = Html::parse_document(html);

    let title = select_first_text(&document, &["h1", "h2"]).unwrap_or_default();

    let company = select_first_text(&document, COMPANY_SELECTORS)
        .or_else(|| label_value(&document, &["Company", "Company Name"]))
        .unwrap_or_default();

    if title.is_empty() || company.is_empty() {
        return None;
    }

    let posting_raw =
        label_value(&document, &["Posted Date", "Date Posted", "Posted"]).unwrap_or_default();
    let posting_date = dates::parse_posting_date(&posting_raw, now)
        .unwrap_or_else(|| now.date_naive())
        .to_string();

    let (mut city, mut country) = (String::new(), String::new());
    if let Some(value) = label_value(&document, &["Location", "City"]) {
        let parts: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        match parts.as_slice() {
            [] => {}
            [only] => city = only.to_string(),
            [first, .., last] => {
                city = first.to_string();
                country = last.to_string();
            }
        }
    }
    if let Some(value) = label_value(&document, &["Country"]) {
        country = value;
    }

    let location = [city.as_str(), country.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    let page_text = document.root_element().text().collect::<String>();
    let job_type = label_value(&document, &["Job Type", "Working Schedule"])
        .and_then(|value| guess_job_type(&value))
        .or_else(|| guess_job_type(&page_text))
        .unwrap_or("Full-time")
        .to_string();

    Some(JobCandidate {
        title,
        company,
        city,
        country,
        location,
        posting_date,
        job_type,
        tags: extract_tags(&document),
        job_url: url.to_string(),
    })
}

fn select_first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Find a "Label: Value" pair anywhere on the page.
///
/// Handles both a single text node ("Posted Date: 3 days ago") and a
/// bold label whose value sits in the following sibling node.
fn label_value(document: &Html, labels: &[&str]) -> Option<String> {
    for text in document.root_element().text() {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        for label in labels {
            if starts_with_ignore_case(text, label) {
                if let Some((_, value)) = text.split_once(':') {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("strong, b, dt") {
        for element in document.select(&selector) {
            let key = element.text().collect::<String>();
            let key = key.trim();
            for label in labels {
                if key.to_lowercase().contains(&label.to_lowercase()) {
                    if let Some(value) = following_text(element) {
                        let value = value.trim().trim_start_matches(':').trim();
                        if !value.is_empty() && !value.to_lowercase().contains(&label.to_lowercase())
                        {
                            return Some(value.to_string());
                        }
                    }
                }
            }
        }
    }

    None
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_ascii_lowercase()
        .starts_with(&prefix.to_ascii_lowercase())
}

/// First non-empty text after an element, skipping empty nodes.
fn following_text(element: ElementRef) -> Option<String> {
    let mut node = element.next_sibling();
    while let Some(current) = node {
        if let Some(text) = current.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        } else if let Some(child) = ElementRef::wrap(current) {
            let text = child.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
        node = current.next_sibling();
    }
    None
}

fn guess_job_type(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    if text.contains("intern") {
        Some("Internship")
    } else if text.contains("part-time") || text.contains("part time") {
        Some("Part-time")
    } else if text.contains("contract") || text.contains("temporary") {
        Some("Contract")
    } else if text.contains("full-time") || text.contains("full time") {
        Some("Full-time")
    } else {
        None
    }
}

fn extract_tags(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for selector_str in TAG_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let text = element.text().collect::<String>().trim().to_string();
                if text.len() <= 2 || text.len() > 30 {
                    continue;
                }
                let lower = text.to_lowercase();
                if TAG_SKIP_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                    continue;
                }
                if seen.insert(lower) {
                    tags.push(text);
                    if tags.len() == MAX_TAGS {
                        return tags;
                    }
                }
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    const LISTING_HTML: &str = r#"
        <html><body>
          <a href="/actuarial-jobs/1-pricing-actuary">Pricing Actuary</a>
          <a href="https://www.actuarylist.com/actuarial-jobs/2-life-actuary">Life Actuary</a>
          <a href="/actuarial-jobs/1-pricing-actuary">Pricing Actuary (again)</a>
          <a href="/sectors/health">Health jobs</a>
        </body></html>
    "#;

    #[test]
    fn listing_links_are_absolute_and_deduplicated() {
        let links = listing_links(LISTING_HTML, "https://www.actuarylist.com");
        assert_eq!(
            links,
            vec![
                "https://www.actuarylist.com/actuarial-jobs/1-pricing-actuary",
                "https://www.actuarylist.com/actuarial-jobs/2-life-actuary",
            ]
        );
    }

    const DETAIL_HTML: &str = r#"
        <html><body>
          <h1>Senior Pricing Actuary</h1>
          <div><a href="/company/acme-re">Acme Re</a></div>
          <ul>
            <li>Posted Date: 3 days ago</li>
            <li>Location: London, United Kingdom</li>
            <li>Working Schedule: Full-time</li>
          </ul>
          <div class="tags">
            <a>Life</a><a>Pricing</a><a>Life</a><a>GI</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn detail_page_extracts_all_fields() {
        let candidate = job_from_detail(
            DETAIL_HTML,
            "https://www.actuarylist.com/actuarial-jobs/1",
            now(),
        )
        .unwrap();

        assert_eq!(candidate.title, "Senior Pricing Actuary");
        assert_eq!(candidate.company, "Acme Re");
        assert_eq!(candidate.posting_date, "2025-06-12");
        assert_eq!(candidate.city, "London");
        assert_eq!(candidate.country, "United Kingdom");
        assert_eq!(candidate.location, "London, United Kingdom");
        assert_eq!(candidate.job_type, "Full-time");
        assert_eq!(candidate.tags, vec!["Life", "Pricing"]);
        assert_eq!(
            candidate.job_url,
            "https://www.actuarylist.com/actuarial-jobs/1"
        );
    }

    #[test]
    fn bold_label_value_pairs_are_found() {
        let html = r#"
            <html><body>
              <h1>Actuarial Intern</h1>
              <p><strong>Company:</strong> Meridian Life</p>
              <p><strong>Posted:</strong> 19-Oct-2025</p>
            </body></html>
        "#;
        let candidate = job_from_detail(html, "https://example.com/j/1", now()).unwrap();
        assert_eq!(candidate.company, "Meridian Life");
        assert_eq!(candidate.posting_date, "2025-10-19");
        // No explicit type label; guessed from the page text.
        assert_eq!(candidate.job_type, "Internship");
    }

    #[test]
    fn page_without_title_or_company_is_skipped() {
        let html = "<html><body><p>Nothing here</p></body></html>";
        assert!(job_from_detail(html, "https://example.com/j/1", now()).is_none());
    }

    #[test]
    fn missing_posting_date_falls_back_to_today() {
        let html = r#"
            <html><body>
              <h1>Actuary</h1>
              <p class="company">Acme</p>
            </body></html>
        "#;
        let candidate = job_from_detail(html, "https://example.com/j/1", now()).unwrap();
        assert_eq!(candidate.posting_date, "2025-06-15");
    }

    #[test]
    fn metadata_chips_are_not_tags() {
        let html = r#"
            <html><body>
              <h1>Actuary</h1>
              <p class="company">Acme</p>
              <div class="tags">
                <span>Posted 3 days ago</span>
                <span>Location: London</span>
                <span>Pensions</span>
              </div>
            </body></html>
        "#;
        let candidate = job_from_detail(html, "https://example.com/j/1", now()).unwrap();
        assert_eq!(candidate.tags, vec!["Pensions"]);
    }
}
