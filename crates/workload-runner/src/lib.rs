//! Workload execution for the order-workload driver.
//!
//! This crate drives units of work against any
//! [`SessionProvider`](workload_core::SessionProvider):
//!
//! - [`UnitOfWorkExecutor`] - one order, one transaction, one session
//! - [`WorkerPool`] - bounded burst across a fixed number of tasks
//! - [`PacedScheduler`] - continuous batches with a cancellable pause
//! - [`Shutdown`] - cooperative cancellation fed by Ctrl+C
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────┐                 ┌────────────────┐
//!            │  WorkerPool  │                 │ PacedScheduler │
//!            │ (N tasks)    │                 │ (1 loop)       │
//!            └──────┬───────┘                 └───────┬────────┘
//!                   │ OrderGenerator per task         │ OrderGenerator
//!                   ▼                                 ▼
//!           ┌─────────────────────────────────────────────────┐
//!           │               UnitOfWorkExecutor                 │
//!           │   open → BEGIN → place_order → COMMIT/ROLLBACK   │
//!           │                  → release                       │
//!           └─────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//!                        WorkerTally / Aggregator
//!                                   │
//!                                   ▼
//!                              RunSummary
//! ```

pub mod burst;
pub mod continuous;
pub mod error;
pub mod executor;
pub mod shutdown;
pub mod testing;

pub use burst::{BurstConfig, BurstReport, WorkerPool};
pub use continuous::{BatchReport, ContinuousConfig, ContinuousReport, PacedScheduler, StopReason};
pub use error::WorkloadError;
pub use executor::UnitOfWorkExecutor;
pub use shutdown::{ctrl_c_shutdown, Shutdown};
