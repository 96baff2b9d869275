//! Continuous mode: sequential batches separated by a cancellable pause.

use crate::error::WorkloadError;
use crate::executor::UnitOfWorkExecutor;
use crate::shutdown::Shutdown;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use workload_core::{Aggregator, OrderBounds, RunSummary, SessionProvider};
use workload_generator::OrderGenerator;

/// Parameters of a continuous run.
#[derive(Debug, Clone)]
pub struct ContinuousConfig {
    pub batch_size: u64,
    /// Pause between the end of one batch and the start of the next.
    pub interval: Duration,
    pub bounds: OrderBounds,
    pub seed: Option<u64>,
    /// Stop after this many batches; `None` runs until shutdown.
    pub max_batches: Option<u64>,
}

impl ContinuousConfig {
    fn validate(&self) -> Result<(), WorkloadError> {
        if self.batch_size == 0 {
            return Err(WorkloadError::Config(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.max_batches == Some(0) {
            return Err(WorkloadError::Config(
                "max batches must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Summary of one batch, handed to the caller as soon as the batch ends.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 1-based batch number.
    pub batch: u64,
    /// Units of work the batch was supposed to run.
    pub requested: u64,
    /// Shutdown cut the batch short.
    pub interrupted: bool,
    pub summary: RunSummary,
    #[serde(skip)]
    pub started_at: Instant,
    #[serde(skip)]
    pub finished_at: Instant,
}

/// Why a continuous run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Shutdown,
    BatchLimit,
}

/// Result of a whole continuous run.
#[derive(Debug, Clone, Serialize)]
pub struct ContinuousReport {
    pub batches: u64,
    /// All attempts of the run; elapsed covers the pauses too.
    pub totals: RunSummary,
    pub stop_reason: StopReason,
}

/// Single control loop placing `batch_size` orders per cycle.
///
/// Shutdown is honored after the unit of work in flight completes, or
/// immediately during the pause. A unit of work is never abandoned
/// mid-transaction.
pub struct PacedScheduler<P: SessionProvider> {
    executor: Arc<UnitOfWorkExecutor<P>>,
    config: ContinuousConfig,
}

impl<P: SessionProvider> PacedScheduler<P> {
    pub fn new(
        executor: Arc<UnitOfWorkExecutor<P>>,
        config: ContinuousConfig,
    ) -> Result<Self, WorkloadError> {
        config.validate()?;
        Ok(Self { executor, config })
    }

    pub fn config(&self) -> &ContinuousConfig {
        &self.config
    }

    /// Run until shutdown (or the batch limit), calling `on_batch` after
    /// every batch.
    pub async fn run<F>(&self, mut shutdown: Shutdown, mut on_batch: F) -> ContinuousReport
    where
        F: FnMut(&BatchReport),
    {
        let config = &self.config;
        info!(
            batch_size = config.batch_size,
            interval_ms = config.interval.as_millis() as u64,
            "Starting continuous ingestion"
        );

        let run_start = Instant::now();
        let mut totals = Aggregator::new();
        let mut generator = OrderGenerator::for_context(config.bounds, config.seed, 0);
        let mut batch = 0u64;

        let stop_reason = loop {
            if shutdown.is_triggered() {
                break StopReason::Shutdown;
            }

            batch += 1;
            info!("Batch {}: ingesting {} orders...", batch, config.batch_size);

            let started_at = Instant::now();
            let mut aggregator = Aggregator::new();
            let mut stop_requested = false;

            for _ in 0..config.batch_size {
                let outcome = self.executor.execute(generator.next_request()).await;
                aggregator.record(&outcome);
                totals.record(&outcome);

                if shutdown.is_triggered() {
                    stop_requested = true;
                    break;
                }
            }

            let finished_at = Instant::now();
            let report = BatchReport {
                batch,
                requested: config.batch_size,
                interrupted: aggregator.attempts() < config.batch_size,
                summary: aggregator.summarize(finished_at - started_at),
                started_at,
                finished_at,
            };
            info!(
                "Batch {} complete. successes={}, failures={}",
                batch, report.summary.successes, report.summary.failures
            );
            on_batch(&report);

            if stop_requested {
                break StopReason::Shutdown;
            }
            if config.max_batches.is_some_and(|max| batch >= max) {
                break StopReason::BatchLimit;
            }

            tokio::select! {
                _ = tokio::time::sleep(config.interval) => {}
                _ = shutdown.recv() => break StopReason::Shutdown,
            }
        };

        info!(batches = batch, reason = ?stop_reason, "Stopping continuous ingestion");

        ContinuousReport {
            batches: batch,
            totals: totals.summarize(run_start.elapsed()),
            stop_reason,
        }
    }
}
