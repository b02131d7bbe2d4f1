//! Job record model shared between the runner and its stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a job
///
/// `Pending` and `Running` are transient; `Succeeded`, `Failed` and
/// `Cancelled` are terminal — once a job reaches one of them its record is
/// never transitioned again, only read or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Created and persisted, not yet picked up for execution
    Pending,
    /// Executor is currently running
    Running,
    /// Executor returned a result
    Succeeded,
    /// Executor returned an error
    Failed,
    /// Execution context was cancelled before completion
    Cancelled,
}

impl JobStatus {
    /// Whether this status permits no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// A unit of trackable work
///
/// During a job's active life the service's execution flow is the sole
/// writer; stores persist whatever they are handed without interpreting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Caller-supplied label, immutable after creation
    #[serde(rename = "type")]
    pub job_type: String,
    /// Current lifecycle state
    pub status: JobStatus,
    /// Completion percentage, always within 0..=100 (clamped, not ordered)
    pub progress: u8,
    /// Latest human-readable status line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Opaque success payload, set only on transition to `Succeeded`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure description, set only on transition to `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job in `Pending` state
    pub fn new(job_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_type: job_type.into(),
            status: JobStatus::Pending,
            progress: 0,
            message: None,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`; called on every mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
