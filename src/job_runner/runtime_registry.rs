//! Cancellation handles for currently executing jobs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Job id → cancellation token map for jobs that are executing
///
/// Owned by a [`JobService`](super::JobService) instance rather than living
/// as process-global state, so independent services never interfere. An entry
/// exists exactly while its job is executing: registered immediately before
/// dispatch, removed unconditionally when execution finishes. No lock is held
/// across an await point.
#[derive(Debug, Default)]
pub(crate) struct RuntimeRegistry {
    active: Mutex<HashMap<Uuid, CancellationToken>>,
}

impl RuntimeRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, id: Uuid, token: CancellationToken) {
        self.active.lock().unwrap().insert(id, token);
    }

    pub(crate) fn deregister(&self, id: Uuid) {
        self.active.lock().unwrap().remove(&id);
    }

    /// Trigger the token for a job; `false` when no handle exists
    pub(crate) fn cancel(&self, id: Uuid) -> bool {
        match self.active.lock().unwrap().get(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, id: Uuid) -> bool {
        self.active.lock().unwrap().contains_key(&id)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }
}

/// Removes a registry entry when dropped, so cleanup runs on every exit path
/// of the execution body, panics included
pub(crate) struct RuntimeGuard {
    registry: Arc<RuntimeRegistry>,
    id: Uuid,
}

impl RuntimeGuard {
    pub(crate) fn new(registry: Arc<RuntimeRegistry>, id: Uuid) -> Self {
        Self { registry, id }
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}
