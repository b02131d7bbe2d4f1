//! Runner configuration

use serde::{Deserialize, Serialize};

/// Configuration for the job runner's bounded worker pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRunnerConfig {
    /// Number of long-lived workers executing pooled jobs
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Tasks that may wait beyond the ones workers are already executing
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_worker_count() -> usize {
    10
}

fn default_queue_capacity() -> usize {
    100
}

impl Default for JobRunnerConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            queue_capacity: default_queue_capacity(),
        }
    }
}
