//! Per-job progress reporting surface

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::models::Job;
use crate::stores::JobStore;

/// Write surface an executor gets into its own job record
///
/// The only mutation executor code can perform is `progress`: status, result
/// and error stay under the service's control. The handle is cheap to clone
/// and can be moved into sub-tasks of the executor.
#[derive(Clone)]
pub struct ProgressReporter {
    store: Arc<dyn JobStore>,
    job: Arc<Mutex<Job>>,
}

impl ProgressReporter {
    pub(crate) fn new(store: Arc<dyn JobStore>, job: Arc<Mutex<Job>>) -> Self {
        Self { store, job }
    }

    /// Record progress and a status message
    ///
    /// `percent` is clamped into [0, 100]; values are overwritten as given,
    /// with no monotonicity requirement. The write is persisted best-effort:
    /// a store failure is logged and never surfaced to the executor.
    pub async fn progress(&self, percent: i32, message: impl Into<String>) {
        let mut job = self.job.lock().await;
        job.progress = percent.clamp(0, 100) as u8;
        job.message = Some(message.into());
        job.touch();

        // Persisted under the job lock so a racing terminal write is ordered
        // strictly after this update.
        if let Err(err) = self.store.update(&job).await {
            warn!("failed to persist progress for job {}: {}", job.id, err);
        }
    }
}
