//! Core types for the order-workload driver.
//!
//! This crate provides the foundational types shared by every other crate in
//! the workspace:
//!
//! - [`OrderRequest`] / [`OrderBounds`] - synthetic order parameters and their ranges
//! - [`UnitOfWorkOutcome`] / [`ErrorKind`] - the result of one transactional attempt
//! - [`WorkerTally`] / [`RunSummary`] / [`Aggregator`] - outcome accumulation
//! - [`SessionProvider`] / [`OrderSession`] - the seam to the backing store
//!
//! # Architecture
//!
//! ```text
//! workload-core (this crate)
//!    │
//!    ├─── workload-generator   (produces OrderRequest values)
//!    ├─── workload-postgresql  (implements SessionProvider for tokio-postgres)
//!    └─── workload-runner      (executor, worker pool, paced scheduler)
//! ```

pub mod error;
pub mod outcome;
pub mod request;
pub mod summary;
pub mod traits;

pub use error::StoreError;
pub use outcome::{ErrorKind, TransactionFailure, UnitOfWorkOutcome};
pub use request::{InvalidBounds, OrderBounds, OrderRequest, MAX_QUANTITY, MIN_QUANTITY};
pub use summary::{Aggregator, FailureBreakdown, RunSummary, Throughput, WorkerTally};
pub use traits::{OrderSession, SessionProvider};
