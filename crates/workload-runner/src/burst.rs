//! Bounded-burst mode: a fixed pool of workers, each placing a fixed number
//! of orders.

use crate::error::WorkloadError;
use crate::executor::UnitOfWorkExecutor;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use workload_core::{Aggregator, OrderBounds, RunSummary, SessionProvider, WorkerTally};
use workload_generator::OrderGenerator;

/// Parameters of one burst.
#[derive(Debug, Clone)]
pub struct BurstConfig {
    pub workers: usize,
    pub orders_per_worker: u64,
    pub bounds: OrderBounds,
    /// Base seed; worker `i` draws from `seed + i`. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl BurstConfig {
    pub fn total_orders(&self) -> u64 {
        self.workers as u64 * self.orders_per_worker
    }

    fn validate(&self) -> Result<(), WorkloadError> {
        if self.workers == 0 {
            return Err(WorkloadError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a completed burst.
#[derive(Debug, Clone, Serialize)]
pub struct BurstReport {
    pub workers: usize,
    pub orders_per_worker: u64,
    pub summary: RunSummary,
    /// One tally per worker, ordered by worker id.
    pub tallies: Vec<WorkerTally>,
}

impl BurstReport {
    /// Units of work the burst was configured to issue.
    pub fn attempts_issued(&self) -> u64 {
        self.workers as u64 * self.orders_per_worker
    }
}

/// Runs a burst over `workers` independent tasks.
///
/// Work is partitioned statically: every worker places exactly
/// `orders_per_worker` orders, sequentially, into its own tally. The only
/// synchronization is the final join.
pub struct WorkerPool<P: SessionProvider> {
    executor: Arc<UnitOfWorkExecutor<P>>,
    config: BurstConfig,
}

impl<P: SessionProvider + 'static> WorkerPool<P> {
    pub fn new(
        executor: Arc<UnitOfWorkExecutor<P>>,
        config: BurstConfig,
    ) -> Result<Self, WorkloadError> {
        config.validate()?;
        Ok(Self { executor, config })
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    /// Run the burst and block until every worker has finished.
    pub async fn run(&self) -> Result<BurstReport, WorkloadError> {
        let config = &self.config;
        info!(
            workers = config.workers,
            orders_per_worker = config.orders_per_worker,
            total_orders = config.total_orders(),
            "Starting burst"
        );

        let start = Instant::now();

        let handles: Vec<_> = (1..=config.workers)
            .map(|worker_id| {
                let executor = Arc::clone(&self.executor);
                let generator = OrderGenerator::for_context(config.bounds, config.seed, worker_id);
                tokio::spawn(run_worker(
                    executor,
                    generator,
                    worker_id,
                    config.orders_per_worker,
                ))
            })
            .collect();

        let results = join_all(handles).await;
        let elapsed = start.elapsed();

        let mut tallies = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(tally) => tallies.push(tally),
                Err(e) => {
                    return Err(WorkloadError::WorkerPanicked {
                        worker_id: index + 1,
                        message: e.to_string(),
                    })
                }
            }
        }

        let summary = Aggregator::summarize_tallies(&tallies, elapsed);
        info!(
            successes = summary.successes,
            failures = summary.failures,
            elapsed_secs = summary.elapsed_seconds,
            "Burst complete"
        );

        Ok(BurstReport {
            workers: config.workers,
            orders_per_worker: config.orders_per_worker,
            summary,
            tallies,
        })
    }
}

async fn run_worker<P: SessionProvider>(
    executor: Arc<UnitOfWorkExecutor<P>>,
    mut generator: OrderGenerator,
    worker_id: usize,
    orders: u64,
) -> WorkerTally {
    let mut tally = WorkerTally::new(worker_id);
    for _ in 0..orders {
        let request = generator.next_request();
        let outcome = executor.execute(request).await;
        tally.record(&outcome);
    }
    debug!(
        worker_id,
        successes = tally.successes,
        failures = tally.failures,
        "Worker finished"
    );
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;

    fn config(workers: usize, orders_per_worker: u64) -> BurstConfig {
        BurstConfig {
            workers,
            orders_per_worker,
            bounds: OrderBounds::new(10, 10).unwrap(),
            seed: Some(42),
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        let executor = Arc::new(UnitOfWorkExecutor::new(ScriptedProvider::new()));
        assert!(matches!(
            WorkerPool::new(executor, config(0, 5)),
            Err(WorkloadError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_tallies_are_ordered_by_worker() {
        let executor = Arc::new(UnitOfWorkExecutor::new(ScriptedProvider::new()));
        let pool = WorkerPool::new(executor, config(3, 2)).unwrap();

        let report = pool.run().await.unwrap();

        let ids: Vec<_> = report.tallies.iter().map(|t| t.worker_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(report.tallies.iter().all(|t| t.attempts == 2));
        assert_eq!(report.attempts_issued(), 6);
    }

    #[tokio::test]
    async fn test_zero_orders_per_worker() {
        let executor = Arc::new(UnitOfWorkExecutor::new(ScriptedProvider::new()));
        let pool = WorkerPool::new(executor, config(4, 0)).unwrap();

        let report = pool.run().await.unwrap();

        assert_eq!(report.summary.attempts, 0);
        assert!(report.summary.is_balanced());
    }
}
