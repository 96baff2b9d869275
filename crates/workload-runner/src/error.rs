//! Run-terminating errors.
//!
//! Failures of individual units of work are never reported here; they are
//! counted in the run summary instead.

use thiserror::Error;
use workload_core::StoreError;

/// Errors that stop a run (or prevent it from starting).
#[derive(Error, Debug)]
pub enum WorkloadError {
    /// Run parameters can never produce a valid run.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No session could be established before the run started.
    #[error("Preflight connection failed: {0}")]
    Preflight(StoreError),

    /// A worker task died, so its tally is lost.
    #[error("Worker {worker_id} did not complete: {message}")]
    WorkerPanicked { worker_id: usize, message: String },
}
