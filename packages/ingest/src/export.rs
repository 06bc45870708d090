//! Snapshot files for a scrape run: jobs.json and jobs.csv.

use anyhow::{Context, Result};
use server_core::domains::jobs::JobCandidate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the full candidate set as pretty-printed JSON.
pub fn write_json(path: &Path, jobs: &[JobCandidate]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), jobs)
        .context("Failed to serialize jobs to JSON")?;
    Ok(())
}

/// Write the candidate set as CSV; tags are joined with commas inside a
/// quoted field.
pub fn write_csv(path: &Path, jobs: &[JobCandidate]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "title,company,city,country,location,posting_date,job_type,tags,job_url"
    )?;
    for job in jobs {
        let tags = job.tags.join(",");
        let row = [
            job.title.as_str(),
            job.company.as_str(),
            job.city.as_str(),
            job.country.as_str(),
            job.location.as_str(),
            job.posting_date.as_str(),
            job.job_type.as_str(),
            tags.as_str(),
            job.job_url.as_str(),
        ]
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
        writeln!(writer, "{row}")?;
    }

    Ok(())
}

/// Quote a field when it contains a separator, quote, or newline;
/// embedded quotes double per RFC 4180.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
