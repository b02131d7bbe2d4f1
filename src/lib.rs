//! In-process asynchronous job runner
//!
//! Callers submit executors — async closures given a cancellation token and a
//! progress handle — and get back a persisted, queryable job record that the
//! runner drives through `Pending → Running → {Succeeded, Failed, Cancelled}`.
//! Execution is either bounded through a fixed-size worker pool or detached
//! with no ceiling; persistence goes through the [`stores::JobStore`] trait.
//!
//! ```no_run
//! use std::sync::Arc;
//! use jobkit::{JobService, MemoryJobStore, ProgressReporter};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), jobkit::JobError> {
//! let service = JobService::new(Arc::new(MemoryJobStore::new()));
//!
//! let job = service
//!     .start_pooled("reindex", |token: CancellationToken, progress: ProgressReporter| async move {
//!         progress.progress(50, "halfway there").await;
//!         if token.is_cancelled() {
//!             return Ok(serde_json::Value::Null);
//!         }
//!         Ok::<_, anyhow::Error>(serde_json::json!({"indexed": 1280}))
//!     })
//!     .await?;
//!
//! let current = service.get(job.id).await?;
//! println!("{}: {}", current.id, current.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod job_runner;
pub mod models;
pub mod stores;

pub use config::JobRunnerConfig;
pub use job_runner::{
    DispatchMode, Executor, ExecutorResult, JobError, JobService, ProgressReporter, WorkerPool,
};
pub use models::{Job, JobStatus};
pub use stores::{JobFilter, JobStore, MemoryJobStore, StoreError};
