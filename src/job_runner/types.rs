//! Job runner type definitions

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::progress_reporter::ProgressReporter;
use crate::stores::StoreError;

/// Value an executor resolves to: an opaque success payload or a failure
pub type ExecutorResult = Result<serde_json::Value, anyhow::Error>;

/// Boxed form of the executor contract, used internally by the service
///
/// Callers pass closures; see [`Executor`] for the bounds they must satisfy.
pub type BoxedExecutor =
    Box<dyn FnOnce(CancellationToken, ProgressReporter) -> BoxFuture<'static, ExecutorResult> + Send>;

/// Caller-supplied unit of work
///
/// An executor receives a cancellable context and a progress handle scoped to
/// its own job. Cancellation is cooperative and advisory: `cancel` returns
/// before the job stops, and the executor must observe the token
/// (`token.is_cancelled()` or `token.cancelled().await`) to stop promptly.
/// The runner never forcibly interrupts executor code.
pub trait Executor: Send + 'static {
    type Fut: Future<Output = ExecutorResult> + Send + 'static;

    fn execute(self, token: CancellationToken, progress: ProgressReporter) -> Self::Fut;
}

impl<F, Fut> Executor for F
where
    F: FnOnce(CancellationToken, ProgressReporter) -> Fut + Send + 'static,
    Fut: Future<Output = ExecutorResult> + Send + 'static,
{
    type Fut = Fut;

    fn execute(self, token: CancellationToken, progress: ProgressReporter) -> Self::Fut {
        self(token, progress)
    }
}

/// Concurrency regime for a dispatched job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Route through the worker pool; bounded, may reject with
    /// [`JobError::QueueFull`]
    Pooled,
    /// Spawn an independent task immediately; no ceiling, never rejects
    Detached,
}

/// Errors that can occur in the job runner
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// No persisted record exists for this id
    #[error("job {id} not found")]
    NotFound { id: Uuid },

    /// Cancellation was requested for a job that is not executing
    #[error("job {id} is not running or already finished")]
    NotRunning { id: Uuid },

    /// Removal was requested while the job is still executing
    #[error("job {id} is still running; cancel it before removal")]
    StillRunning { id: Uuid },

    /// The worker pool queue is at capacity
    #[error("worker pool queue is full")]
    QueueFull,

    /// Workers did not drain within the stop deadline
    #[error("worker pool did not stop within {waited:?}")]
    StopTimeout { waited: Duration },

    /// Store operation failed
    #[error("store operation failed: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for JobError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => JobError::NotFound { id },
            other => JobError::Store(other),
        }
    }
}
