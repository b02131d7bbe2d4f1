//! In-memory job store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{JobFilter, JobStore, StoreError};
use crate::models::Job;

/// Reference [`JobStore`] backed by a `HashMap`
///
/// Suitable for tests and embedders that do not need durability. Records are
/// cloned on the way in and out, so callers never observe each other's
/// in-flight mutations.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: &Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists { id: job.id });
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> Result<(), StoreError> {
        self.jobs.write().await.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Job, StoreError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.jobs.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        let mut matches = Vec::new();

        for job in jobs.values() {
            if !filter.matches(job) {
                continue;
            }
            matches.push(job.clone());
            if let Some(limit) = filter.limit {
                if limit > 0 && matches.len() >= limit {
                    break;
                }
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryJobStore::new();
        let job = Job::new("export");

        store.create(&job).await.unwrap();
        let fetched = store.get(job.id).await.unwrap();

        assert_eq!(fetched, job);
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let store = MemoryJobStore::new();
        let job = Job::new("export");

        store.create(&job).await.unwrap();
        let err = store.create(&job).await.unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists { id } if id == job.id));
    }

    #[tokio::test]
    async fn test_get_missing_fails() {
        let store = MemoryJobStore::new();
        let id = Uuid::new_v4();

        let err = store.get(id).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound { id: missing } if missing == id));
    }

    #[tokio::test]
    async fn test_update_is_upsert() {
        let store = MemoryJobStore::new();
        let mut job = Job::new("export");

        // Update without a prior create inserts the record
        store.update(&job).await.unwrap();

        job.status = JobStatus::Running;
        job.progress = 40;
        store.update(&job).await.unwrap();

        let fetched = store.get(job.id).await.unwrap();
        assert_eq!(fetched.status, JobStatus::Running);
        assert_eq!(fetched.progress, 40);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let store = MemoryJobStore::new();
        store.remove(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes() {
        let store = MemoryJobStore::new();
        let job = Job::new("export");

        store.create(&job).await.unwrap();
        store.remove(job.id).await.unwrap();

        assert!(store.get(job.id).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_filters_and_limit() {
        let store = MemoryJobStore::new();

        for _ in 0..3 {
            store.create(&Job::new("export")).await.unwrap();
        }
        let mut running = Job::new("import");
        running.status = JobStatus::Running;
        store.create(&running).await.unwrap();

        let exports = store
            .list(&JobFilter {
                job_type: Some("export".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(exports.len(), 3);

        let running_jobs = store
            .list(&JobFilter {
                status: Some(JobStatus::Running),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(running_jobs.len(), 1);
        assert_eq!(running_jobs[0].id, running.id);

        let limited = store
            .list(&JobFilter {
                job_type: Some("export".to_string()),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);

        // Zero limit means unbounded
        let all = store
            .list(&JobFilter {
                limit: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
    }
}
