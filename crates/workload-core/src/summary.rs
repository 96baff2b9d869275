//! Outcome accumulation and throughput derivation.

use crate::outcome::{ErrorKind, TransactionFailure, UnitOfWorkOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Failure counts split by [`ErrorKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBreakdown {
    pub connection: u64,
    pub constraint_violation: u64,
    pub insufficient_resource: u64,
    pub contention: u64,
    pub connection_lost: u64,
    pub other: u64,
    pub unexpected: u64,
}

impl FailureBreakdown {
    pub fn record(&mut self, kind: ErrorKind) {
        *self.slot_mut(kind) += 1;
    }

    pub fn get(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::Connection => self.connection,
            ErrorKind::Transaction(TransactionFailure::ConstraintViolation) => {
                self.constraint_violation
            }
            ErrorKind::Transaction(TransactionFailure::InsufficientResource) => {
                self.insufficient_resource
            }
            ErrorKind::Transaction(TransactionFailure::Contention) => self.contention,
            ErrorKind::Transaction(TransactionFailure::ConnectionLost) => self.connection_lost,
            ErrorKind::Transaction(TransactionFailure::Other) => self.other,
            ErrorKind::Unexpected => self.unexpected,
        }
    }

    pub fn merge(&mut self, other: &FailureBreakdown) {
        self.connection += other.connection;
        self.constraint_violation += other.constraint_violation;
        self.insufficient_resource += other.insufficient_resource;
        self.contention += other.contention;
        self.connection_lost += other.connection_lost;
        self.other += other.other;
        self.unexpected += other.unexpected;
    }

    pub fn total(&self) -> u64 {
        self.connection
            + self.constraint_violation
            + self.insufficient_resource
            + self.contention
            + self.connection_lost
            + self.other
            + self.unexpected
    }

    /// Non-zero entries, in a stable order, for display.
    pub fn non_zero(&self) -> Vec<(&'static str, u64)> {
        [
            ("connection", self.connection),
            ("constraint_violation", self.constraint_violation),
            ("insufficient_resource", self.insufficient_resource),
            ("contention", self.contention),
            ("connection_lost", self.connection_lost),
            ("other", self.other),
            ("unexpected", self.unexpected),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }

    fn slot_mut(&mut self, kind: ErrorKind) -> &mut u64 {
        match kind {
            ErrorKind::Connection => &mut self.connection,
            ErrorKind::Transaction(TransactionFailure::ConstraintViolation) => {
                &mut self.constraint_violation
            }
            ErrorKind::Transaction(TransactionFailure::InsufficientResource) => {
                &mut self.insufficient_resource
            }
            ErrorKind::Transaction(TransactionFailure::Contention) => &mut self.contention,
            ErrorKind::Transaction(TransactionFailure::ConnectionLost) => {
                &mut self.connection_lost
            }
            ErrorKind::Transaction(TransactionFailure::Other) => &mut self.other,
            ErrorKind::Unexpected => &mut self.unexpected,
        }
    }
}

/// Outcome counts owned by a single execution context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTally {
    pub worker_id: usize,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub failure_breakdown: FailureBreakdown,
}

impl WorkerTally {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    /// Count one outcome. Every call counts exactly one attempt.
    pub fn record(&mut self, outcome: &UnitOfWorkOutcome) {
        self.attempts += 1;
        match outcome {
            UnitOfWorkOutcome::Success { .. } => self.successes += 1,
            UnitOfWorkOutcome::Failure { kind } => {
                self.failures += 1;
                self.failure_breakdown.record(*kind);
            }
        }
    }

    pub fn merge(&mut self, other: &WorkerTally) {
        self.attempts += other.attempts;
        self.successes += other.successes;
        self.failures += other.failures;
        self.failure_breakdown.merge(&other.failure_breakdown);
    }
}

/// Successful orders per second of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Throughput {
    OrdersPerSecond(f64),
    /// Elapsed time was zero, so no rate can be derived.
    Undefined,
}

impl Throughput {
    pub fn derive(successes: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            Throughput::OrdersPerSecond(successes as f64 / secs)
        } else {
            Throughput::Undefined
        }
    }

    pub fn per_second(&self) -> Option<f64> {
        match self {
            Throughput::OrdersPerSecond(rate) => Some(*rate),
            Throughput::Undefined => None,
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Throughput::OrdersPerSecond(rate) => write!(f, "{rate:.2} successful orders/sec"),
            Throughput::Undefined => write!(f, "undefined (no elapsed time)"),
        }
    }
}

/// Aggregated result of a burst or of one continuous-mode batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub failure_breakdown: FailureBreakdown,
    pub elapsed_seconds: f64,
    pub throughput: Throughput,
}

impl RunSummary {
    /// True when no attempt was dropped or double-counted.
    pub fn is_balanced(&self) -> bool {
        self.successes + self.failures == self.attempts
            && self.failure_breakdown.total() == self.failures
    }
}

/// Accumulates outcomes and tallies into a [`RunSummary`].
///
/// Pure accumulation: no I/O and no failure modes.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    combined: WorkerTally,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &UnitOfWorkOutcome) {
        self.combined.record(outcome);
    }

    pub fn merge(&mut self, tally: &WorkerTally) {
        self.combined.merge(tally);
    }

    pub fn attempts(&self) -> u64 {
        self.combined.attempts
    }

    pub fn summarize(&self, elapsed: Duration) -> RunSummary {
        RunSummary {
            attempts: self.combined.attempts,
            successes: self.combined.successes,
            failures: self.combined.failures,
            failure_breakdown: self.combined.failure_breakdown.clone(),
            elapsed_seconds: elapsed.as_secs_f64(),
            throughput: Throughput::derive(self.combined.successes, elapsed),
        }
    }

    /// Merge a set of worker tallies in one step.
    pub fn summarize_tallies<'a>(
        tallies: impl IntoIterator<Item = &'a WorkerTally>,
        elapsed: Duration,
    ) -> RunSummary {
        let mut aggregator = Aggregator::new();
        for tally in tallies {
            aggregator.merge(tally);
        }
        aggregator.summarize(elapsed)
    }
}
