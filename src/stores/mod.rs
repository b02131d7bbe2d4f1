//! Persistence contract consumed by the job runner
//!
//! The runner treats its store as a passive, internally synchronized
//! key-value surface: it persists job records and reads them back, and all
//! business logic stays on the service side. Backends implement [`JobStore`];
//! the bundled [`MemoryJobStore`] is the conformance reference.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Job, JobStatus};

pub use memory::MemoryJobStore;

/// Errors surfaced by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the requested id
    #[error("job {id} not found")]
    NotFound { id: Uuid },

    /// A record with this id already exists
    #[error("job {id} already exists")]
    AlreadyExists { id: Uuid },

    /// Backend-specific failure (connection, serialization, ...)
    #[error("storage backend error: {source}")]
    Backend {
        #[from]
        source: anyhow::Error,
    },
}

/// Predicates for [`JobStore::list`]; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFilter {
    /// Match jobs with exactly this type label
    pub job_type: Option<String>,
    /// Match jobs in exactly this status
    pub status: Option<JobStatus>,
    /// Truncate the result set; `None` or `Some(0)` returns all matches
    pub limit: Option<usize>,
}

impl JobFilter {
    /// Whether a job satisfies every supplied predicate
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(job_type) = &self.job_type {
            if &job.job_type != job_type {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &job.status != status {
                return false;
            }
        }
        true
    }
}

/// CRUD plus filtered listing for job records
///
/// Implementations must be safe for concurrent use from multiple executing
/// jobs; the runner issues writes for a single job sequentially but runs many
/// jobs at once.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new record; fails with [`StoreError::AlreadyExists`] on a
    /// duplicate id. The record must be visible to `get`/`list` on return.
    async fn create(&self, job: &Job) -> Result<(), StoreError>;

    /// Idempotent upsert by id, overwriting all fields.
    async fn update(&self, job: &Job) -> Result<(), StoreError>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> Result<Job, StoreError>;

    /// Delete by id; succeeds as a no-op when the record is absent.
    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    /// Records matching all supplied predicates, truncated at a positive
    /// limit. Ordering is unspecified.
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = JobFilter::default();
        let job = Job::new("any");
        assert!(filter.matches(&job));
    }

    #[test]
    fn test_filter_by_type_and_status() {
        let filter = JobFilter {
            job_type: Some("export".to_string()),
            status: Some(JobStatus::Pending),
            limit: None,
        };

        let matching = Job::new("export");
        assert!(filter.matches(&matching));

        let wrong_type = Job::new("import");
        assert!(!filter.matches(&wrong_type));

        let mut wrong_status = Job::new("export");
        wrong_status.status = JobStatus::Running;
        assert!(!filter.matches(&wrong_status));
    }
}
