//! Job creation, dispatch and lifecycle tracking

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::progress_reporter::ProgressReporter;
use super::runtime_registry::{RuntimeGuard, RuntimeRegistry};
use super::types::{BoxedExecutor, DispatchMode, Executor, JobError};
use super::worker_pool::WorkerPool;
use crate::config::JobRunnerConfig;
use crate::models::{Job, JobStatus};
use crate::stores::{JobFilter, JobStore};

/// Creates jobs, dispatches their executors and drives each job record to a
/// terminal state
///
/// Jobs dispatched [`DispatchMode::Pooled`] share the service's worker pool
/// and are subject to its admission bound; [`DispatchMode::Detached`] jobs
/// each get an independent task with no ceiling. Either way the lifecycle is
/// identical: the record is persisted in `Pending` before anything runs,
/// flips to `Running` when the executor starts, and lands in exactly one of
/// `Succeeded`, `Failed` or `Cancelled`.
pub struct JobService {
    store: Arc<dyn JobStore>,
    pool: WorkerPool,
    registry: Arc<RuntimeRegistry>,
}

impl JobService {
    /// Create a service with the default pool configuration, workers started
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self::with_config(store, &JobRunnerConfig::default())
    }

    /// Create a service with an explicit pool configuration, workers started
    pub fn with_config(store: Arc<dyn JobStore>, config: &JobRunnerConfig) -> Self {
        let pool = WorkerPool::new(config.worker_count, config.queue_capacity);
        pool.start();

        Self {
            store,
            pool,
            registry: Arc::new(RuntimeRegistry::new()),
        }
    }

    /// Create a job and run its executor through the worker pool
    ///
    /// Surfaces [`JobError::QueueFull`] when the pool rejects the submission;
    /// the already persisted record is left in `Pending` and will never run.
    pub async fn start_pooled<E: Executor>(
        &self,
        job_type: &str,
        executor: E,
    ) -> Result<Job, JobError> {
        self.dispatch(DispatchMode::Pooled, job_type, executor).await
    }

    /// Create a job and run its executor as an independent task, bypassing
    /// the pool bound
    pub async fn start_detached<E: Executor>(
        &self,
        job_type: &str,
        executor: E,
    ) -> Result<Job, JobError> {
        self.dispatch(DispatchMode::Detached, job_type, executor).await
    }

    /// Create, persist and dispatch a job under the given concurrency regime
    ///
    /// Returns the `Pending` snapshot of the record immediately; execution is
    /// asynchronous. The job's cancellation context is derived from the
    /// service, not from any caller scope, so the job outlives the request
    /// that started it.
    pub async fn dispatch<E: Executor>(
        &self,
        mode: DispatchMode,
        job_type: &str,
        executor: E,
    ) -> Result<Job, JobError> {
        let job = Job::new(job_type);

        // Persist first; a store rejection aborts the whole operation before
        // any handle or task exists.
        self.store.create(&job).await.map_err(JobError::from)?;

        let token = CancellationToken::new();
        self.registry.register(job.id, token.clone());

        let executor: BoxedExecutor =
            Box::new(move |token, progress| Box::pin(executor.execute(token, progress)));
        let run = Self::execute(
            Arc::clone(&self.store),
            Arc::clone(&self.registry),
            job.clone(),
            token,
            executor,
        );

        match mode {
            DispatchMode::Pooled => {
                if let Err(err) = self.pool.submit(Box::pin(run)) {
                    // Nothing will run, so the handle must go as well
                    self.registry.deregister(job.id);
                    return Err(err);
                }
            }
            DispatchMode::Detached => {
                tokio::spawn(run);
            }
        }

        debug!("dispatched job {} ({}, {:?})", job.id, job.job_type, mode);
        Ok(job)
    }

    /// Request cancellation of a running job
    ///
    /// Advisory and asynchronous: this returns as soon as the job's token is
    /// triggered, and the executor stops only once it observes the token.
    /// Fails with [`JobError::NotRunning`] when the job is unknown, finished,
    /// or was never dispatched.
    pub async fn cancel(&self, id: Uuid) -> Result<(), JobError> {
        if self.registry.cancel(id) {
            info!("cancellation requested for job {}", id);
            Ok(())
        } else {
            Err(JobError::NotRunning { id })
        }
    }

    /// Fetch a job record by id
    pub async fn get(&self, id: Uuid) -> Result<Job, JobError> {
        self.store.get(id).await.map_err(JobError::from)
    }

    /// Delete a job record
    ///
    /// Refused with [`JobError::StillRunning`] while the job is executing:
    /// cancel first, then remove once the record is terminal. Removing an
    /// absent record succeeds as a no-op.
    pub async fn remove(&self, id: Uuid) -> Result<(), JobError> {
        if self.registry.contains(id) {
            return Err(JobError::StillRunning { id });
        }
        self.store.remove(id).await.map_err(JobError::from)
    }

    /// Job records matching the filter
    pub async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, JobError> {
        self.store.list(filter).await.map_err(JobError::from)
    }

    /// Number of jobs currently executing (both dispatch modes)
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    /// Free admission slots on the worker pool
    pub fn available_capacity(&self) -> usize {
        self.pool.available_capacity()
    }

    /// Stop the worker pool, waiting up to `wait` for workers to drain
    ///
    /// Detached jobs are unaffected; in-flight pooled jobs finish in the
    /// background even when this times out.
    pub async fn shutdown(&self, wait: Duration) -> Result<(), JobError> {
        self.pool.stop(wait).await
    }

    /// Execution body shared by both dispatch modes
    async fn execute(
        store: Arc<dyn JobStore>,
        registry: Arc<RuntimeRegistry>,
        job: Job,
        token: CancellationToken,
        executor: BoxedExecutor,
    ) {
        let job_id = job.id;
        let job_type = job.job_type.clone();
        let _cleanup = RuntimeGuard::new(registry, job_id);
        let started_at = std::time::Instant::now();

        let shared = Arc::new(Mutex::new(job));
        {
            let mut job = shared.lock().await;
            job.status = JobStatus::Running;
            job.touch();
            if let Err(err) = store.update(&job).await {
                warn!("failed to persist running status for job {}: {}", job_id, err);
            }
        }

        let reporter = ProgressReporter::new(Arc::clone(&store), Arc::clone(&shared));
        let outcome = executor(token.clone(), reporter).await;

        // Terminal classification: an observed cancellation wins over
        // whatever the executor returned.
        let mut job = shared.lock().await;
        if token.is_cancelled() {
            job.status = JobStatus::Cancelled;
            job.message = Some("job cancelled".to_string());
            info!("job {} ({}) cancelled after {:?}", job_id, job_type, started_at.elapsed());
        } else {
            match outcome {
                Ok(result) => {
                    job.status = JobStatus::Succeeded;
                    job.result = Some(result);
                    job.progress = 100;
                    info!("job {} ({}) succeeded in {:?}", job_id, job_type, started_at.elapsed());
                }
                Err(err) => {
                    job.status = JobStatus::Failed;
                    job.error = Some(err.to_string());
                    warn!(
                        "job {} ({}) failed after {:?}: {}",
                        job_id,
                        job_type,
                        started_at.elapsed(),
                        err
                    );
                }
            }
        }
        job.touch();
        if let Err(err) = store.update(&job).await {
            warn!("failed to persist terminal status for job {}: {}", job_id, err);
        }
    }
}
