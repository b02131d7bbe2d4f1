//! Fixed-size worker pool with bounded, non-blocking admission

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use super::types::JobError;

/// A queued unit of work: a future the accepting worker drives to completion
pub type PoolTask = BoxFuture<'static, ()>;

struct QueuedTask {
    task: PoolTask,
    /// Capacity slot, held from admission until the task finishes
    _slot: OwnedSemaphorePermit,
}

/// Bounds the number of concurrently executing tasks
///
/// A pool admits at most `worker_count + queue_capacity` tasks at a time:
/// one slot per executing task plus `queue_capacity` waiting beyond them.
/// Slots are released when a task finishes, not when it is dequeued, so a
/// zero-capacity pool still hands tasks directly to idle workers while
/// rejecting anything beyond them.
pub struct WorkerPool {
    worker_count: usize,
    queue_tx: mpsc::UnboundedSender<QueuedTask>,
    queue_rx: Arc<Mutex<mpsc::UnboundedReceiver<QueuedTask>>>,
    slots: Arc<Semaphore>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl WorkerPool {
    /// Create a pool; both bounds are fixed for the pool's lifetime
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            worker_count,
            queue_tx,
            queue_rx: Arc::new(Mutex::new(queue_rx)),
            slots: Arc::new(Semaphore::new(worker_count + queue_capacity)),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Launch the workers
    ///
    /// Spawns exactly `worker_count` long-lived workers. Not idempotent:
    /// calling twice launches a second set of workers.
    pub fn start(&self) {
        for worker_id in 0..self.worker_count {
            let queue_rx = Arc::clone(&self.queue_rx);
            let shutdown = self.shutdown.clone();
            self.tracker.spawn(Self::worker_loop(worker_id, queue_rx, shutdown));
        }
        debug!("worker pool started with {} workers", self.worker_count);
    }

    /// Enqueue a task without blocking
    ///
    /// Fails with [`JobError::QueueFull`] when all capacity slots are taken;
    /// the task is not retained in that case.
    pub fn submit(&self, task: PoolTask) -> Result<(), JobError> {
        let slot = match Arc::clone(&self.slots).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => return Err(JobError::QueueFull),
        };

        // The receiver lives inside the pool, so the channel only closes if
        // the pool itself is gone mid-call.
        self.queue_tx
            .send(QueuedTask { task, _slot: slot })
            .map_err(|_| JobError::QueueFull)
    }

    /// Capacity slots currently free
    pub fn available_capacity(&self) -> usize {
        self.slots.available_permits()
    }

    /// Signal shutdown and wait for the workers to exit
    ///
    /// Idempotent. Each worker finishes the task it is executing before
    /// observing the signal; tasks still queued when a worker observes it are
    /// abandoned. If the workers do not exit within `wait`, returns
    /// [`JobError::StopTimeout`] while they keep draining in the background.
    pub async fn stop(&self, wait: Duration) -> Result<(), JobError> {
        self.shutdown.cancel();
        self.tracker.close();

        tokio::time::timeout(wait, self.tracker.wait())
            .await
            .map_err(|_| JobError::StopTimeout { waited: wait })
    }

    async fn worker_loop(
        worker_id: usize,
        queue_rx: Arc<Mutex<mpsc::UnboundedReceiver<QueuedTask>>>,
        shutdown: CancellationToken,
    ) {
        loop {
            let next = {
                let mut queue = queue_rx.lock().await;
                tokio::select! {
                    _ = shutdown.cancelled() => None,
                    queued = queue.recv() => queued,
                }
            };

            // The slot stays held while the task runs and is released when
            // it drops at the end of the iteration.
            match next {
                Some(QueuedTask { task, _slot }) => task.await,
                None => break,
            }
        }
        debug!("worker {} exiting", worker_id);
    }
}
