//! Job execution subsystem
//!
//! This module provides the concurrency and lifecycle machinery of the crate:
//! - `WorkerPool`: fixed-size worker set with bounded, non-blocking admission
//! - `JobService`: job creation, dispatch and the lifecycle state machine
//! - `ProgressReporter`: the narrow write surface handed to executors
//!
//! The cancellation registry lives inside the service; executors only ever
//! see their own token and progress handle.

pub mod job_service;
pub mod progress_reporter;
mod runtime_registry;
pub mod types;
pub mod worker_pool;

pub use job_service::JobService;
pub use progress_reporter::ProgressReporter;
pub use types::*;
pub use worker_pool::{PoolTask, WorkerPool};
