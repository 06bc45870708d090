// Job Board - API Core
//
// This crate provides the backend API for the job board: a Postgres-backed
// record store of job postings, the upsert engine used by both the scraper
// and the create endpoint, and the filter/sort/paginate query engine.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::Config;
