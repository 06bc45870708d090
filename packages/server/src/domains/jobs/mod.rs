//! Job postings domain: record store, upsert engine, and query engine.

pub mod candidate;
pub mod error;
pub mod models;
pub mod query;
pub mod upsert;

pub use candidate::{JobCandidate, JobPatch, NewJob};
pub use error::JobError;
pub use models::{Job, JobType};
pub use query::{JobFilter, SortOrder, TagMode};
pub use upsert::{canonical_url, upsert, DuplicatePolicy, UpsertOutcome};
