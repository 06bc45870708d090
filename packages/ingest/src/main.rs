// Ingestion client: walks actuarylist.com listing pages, extracts
// candidate job records, snapshots them to disk, and feeds them through
// the upsert engine. Re-running over the same pages never duplicates or
// mutates existing rows.

mod client;
mod dates;
mod export;
mod parse;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use server_core::domains::jobs::{canonical_url, upsert, DuplicatePolicy, UpsertOutcome};
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Listing pages with good coverage, walked in order.
const DEFAULT_SEED_PATHS: &[&str] = &[
    "/",
    "/experience-levels/part-qualified",
    "/experience-levels/graduate",
    "/experience-levels/qualified",
    "/experience-levels/senior-actuary",
    "/sectors/health",
];

#[derive(Parser)]
#[command(name = "ingest")]
#[command(about = "Scrape actuarial job listings into the job board database")]
struct Args {
    /// How many jobs to fetch
    #[arg(long, default_value_t = 100)]
    limit: usize,

    /// Listing page URL or path; repeat for several. Defaults to the
    /// built-in seed list.
    #[arg(long = "seed")]
    seeds: Vec<String>,

    /// Site root used to absolutize paths and relative links
    #[arg(long, default_value = "https://www.actuarylist.com")]
    base_url: String,

    /// Directory for jobs.json / jobs.csv snapshots
    #[arg(long, default_value = "output")]
    outdir: PathBuf,

    /// Postgres URL; falls back to DATABASE_URL
    #[arg(long)]
    db_url: Option<String>,

    /// Skip the database entirely (snapshot files only)
    #[arg(long)]
    no_db: bool,

    /// Politeness delay between page fetches
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ingest=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let fetcher = client::Fetcher::new()?;
    let delay = Duration::from_millis(args.delay_ms);

    // Step 1: gather detail links from the seed listing pages.
    let seeds: Vec<String> = if args.seeds.is_empty() {
        DEFAULT_SEED_PATHS
            .iter()
            .map(|path| absolutize_seed(path, &args.base_url))
            .collect()
    } else {
        args.seeds
            .iter()
            .map(|seed| absolutize_seed(seed, &args.base_url))
            .collect()
    };

    let mut seen_links = HashSet::new();
    let mut detail_links = Vec::new();
    for seed in &seeds {
        tracing::info!(url = %seed, "visiting listing page");
        let html = match fetcher.fetch_html(seed).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %seed, error = %e, "failed to fetch listing page");
                continue;
            }
        };
        for link in parse::listing_links(&html, &args.base_url) {
            if seen_links.insert(link.clone()) {
                detail_links.push(link);
            }
        }
        tracing::info!("collected {} links so far", detail_links.len());
        if detail_links.len() >= args.limit {
            break;
        }
        tokio::time::sleep(delay).await;
    }
    detail_links.truncate(args.limit);
    tracing::info!("total unique job links to parse: {}", detail_links.len());

    // Step 2: visit each detail page and extract fields.
    let now = Utc::now();
    let mut seen_urls = HashSet::new();
    let mut candidates = Vec::new();
    for (index, url) in detail_links.iter().enumerate() {
        tracing::info!("[{}/{}] {}", index + 1, detail_links.len(), url);
        let html = match fetcher.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "failed to fetch detail page");
                continue;
            }
        };
        match parse::job_from_detail(&html, url, now) {
            Some(candidate) => {
                // In-run de-duplication by canonical URL.
                if seen_urls.insert(canonical_url(&candidate.job_url)) {
                    candidates.push(candidate);
                }
            }
            None => tracing::warn!(url = %url, "page had no usable title/company"),
        }
        tokio::time::sleep(delay).await;
    }

    // Step 3: snapshot the run to disk.
    std::fs::create_dir_all(&args.outdir)
        .with_context(|| format!("Failed to create {}", args.outdir.display()))?;
    let json_path = args.outdir.join("jobs.json");
    let csv_path = args.outdir.join("jobs.csv");
    export::write_json(&json_path, &candidates)?;
    export::write_csv(&csv_path, &candidates)?;
    tracing::info!("saved {} jobs", candidates.len());
    tracing::info!("JSON: {}", json_path.display());
    tracing::info!("CSV : {}", csv_path.display());

    // Step 4: feed the upsert engine, one candidate at a time.
    if args.no_db {
        return Ok(());
    }

    let _ = dotenvy::dotenv();
    let db_url = args
        .db_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .context("--db-url or DATABASE_URL must be set (or pass --no-db)")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let (mut created, mut skipped, mut failed) = (0u32, 0u32, 0u32);
    for candidate in &candidates {
        match upsert(candidate, DuplicatePolicy::SkipExisting, &pool).await {
            Ok(UpsertOutcome::Created(job)) => {
                created += 1;
                tracing::debug!(id = job.id, job_url = %job.job_url, "stored job");
            }
            Ok(UpsertOutcome::SkippedDuplicate) => skipped += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(job_url = %candidate.job_url, error = %e, "failed to store candidate");
            }
        }
    }
    tracing::info!(created, skipped, failed, "ingestion run complete");

    Ok(())
}

fn absolutize_seed(seed: &str, base_url: &str) -> String {
    if seed.starts_with("http://") || seed.starts_with("https://") {
        seed.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), seed.trim_start_matches('/'))
    }
}
