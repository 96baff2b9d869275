//! Unit-of-work executor.

use crate::error::WorkloadError;
use tracing::{debug, info, warn};
use workload_core::{
    ErrorKind, OrderRequest, OrderSession, SessionProvider, StoreError, UnitOfWorkOutcome,
};

/// Wraps one `place_order` call in a transaction on its own session.
///
/// The session is released on every path that acquired one, and every call
/// yields exactly one [`UnitOfWorkOutcome`]. Store failures are returned as
/// outcomes, never as errors.
pub struct UnitOfWorkExecutor<P: SessionProvider> {
    provider: P,
}

impl<P: SessionProvider> UnitOfWorkExecutor<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Open and release one session to prove the store is reachable at all.
    pub async fn preflight(&self) -> Result<(), WorkloadError> {
        let session = self
            .provider
            .open()
            .await
            .map_err(WorkloadError::Preflight)?;
        self.provider.release(session).await;
        info!("Preflight connection succeeded");
        Ok(())
    }

    /// Place one order.
    pub async fn execute(&self, request: OrderRequest) -> UnitOfWorkOutcome {
        let mut session = match self.provider.open().await {
            Ok(session) => session,
            Err(err) => {
                debug!("Could not open session for {:?}: {}", request, err);
                // Nothing was acquired, so there is nothing to release.
                return UnitOfWorkOutcome::Failure {
                    kind: ErrorKind::Connection,
                };
            }
        };

        let result = attempt(&mut session, &request).await;
        if let Err(err) = &result {
            debug!("Order {:?} failed: {}", request, err);
            if let Err(rollback_err) = session.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
        }

        self.provider.release(session).await;

        match result {
            Ok(order_id) => UnitOfWorkOutcome::Success { order_id },
            Err(err) => UnitOfWorkOutcome::Failure { kind: err.kind() },
        }
    }
}

async fn attempt<S: OrderSession>(
    session: &mut S,
    request: &OrderRequest,
) -> Result<i64, StoreError> {
    session.begin().await?;
    let order_id = session.place_order(request).await?;
    session.commit().await?;
    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Injected, ScriptedProvider};
    use workload_core::TransactionFailure;

    fn request() -> OrderRequest {
        OrderRequest::new(1, 2, 3)
    }

    #[tokio::test]
    async fn test_success_commits_and_releases() {
        let provider = ScriptedProvider::new();
        let executor = UnitOfWorkExecutor::new(provider.clone());

        let outcome = executor.execute(request()).await;

        assert_eq!(outcome, UnitOfWorkOutcome::Success { order_id: 1 });
        let stats = provider.stats();
        assert_eq!(stats.opened, 1);
        assert_eq!(stats.released, 1);
        assert_eq!(stats.committed, 1);
        assert_eq!(stats.rolled_back, 0);
        assert_eq!(provider.requests(), vec![request()]);
    }

    #[tokio::test]
    async fn test_open_failure_is_connection_error_without_release() {
        let provider = ScriptedProvider::new().with_plan(|_| Some(Injected::Open));
        let executor = UnitOfWorkExecutor::new(provider.clone());

        let outcome = executor.execute(request()).await;

        assert_eq!(
            outcome,
            UnitOfWorkOutcome::Failure {
                kind: ErrorKind::Connection
            }
        );
        let stats = provider.stats();
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.opened, 0);
        assert_eq!(stats.released, 0);
    }

    #[tokio::test]
    async fn test_place_order_failure_rolls_back_and_releases() {
        let provider = ScriptedProvider::new().with_plan(|_| {
            Some(Injected::PlaceOrder(TransactionFailure::ConstraintViolation))
        });
        let executor = UnitOfWorkExecutor::new(provider.clone());

        let outcome = executor.execute(request()).await;

        assert_eq!(
            outcome,
            UnitOfWorkOutcome::Failure {
                kind: ErrorKind::Transaction(TransactionFailure::ConstraintViolation)
            }
        );
        let stats = provider.stats();
        assert_eq!(stats.released, 1);
        assert_eq!(stats.rolled_back, 1);
        assert_eq!(stats.committed, 0);
        assert_eq!(stats.open_transactions, 0);
    }

    #[tokio::test]
    async fn test_commit_failure_is_counted_as_failure() {
        let provider = ScriptedProvider::new()
            .with_plan(|_| Some(Injected::Commit(TransactionFailure::ConnectionLost)));
        let executor = UnitOfWorkExecutor::new(provider.clone());

        let outcome = executor.execute(request()).await;

        assert_eq!(
            outcome,
            UnitOfWorkOutcome::Failure {
                kind: ErrorKind::Transaction(TransactionFailure::ConnectionLost)
            }
        );
        assert_eq!(provider.stats().released, 1);
        assert_eq!(provider.stats().open_transactions, 0);
    }

    #[tokio::test]
    async fn test_unexpected_error_is_distinguished() {
        let provider = ScriptedProvider::new().with_plan(|_| Some(Injected::Unexpected));
        let executor = UnitOfWorkExecutor::new(provider.clone());

        let outcome = executor.execute(request()).await;

        assert_eq!(
            outcome,
            UnitOfWorkOutcome::Failure {
                kind: ErrorKind::Unexpected
            }
        );
        assert_eq!(provider.stats().released, 1);
    }

    #[tokio::test]
    async fn test_no_leak_under_repeated_failures() {
        let provider = ScriptedProvider::new().with_plan(|attempt| match attempt % 4 {
            0 => Some(Injected::Open),
            1 => Some(Injected::Begin(TransactionFailure::ConnectionLost)),
            2 => Some(Injected::PlaceOrder(TransactionFailure::Contention)),
            _ => None,
        });
        let executor = UnitOfWorkExecutor::new(provider.clone());

        let mut successes = 0;
        for _ in 0..200 {
            if executor.execute(request()).await.is_success() {
                successes += 1;
            }
        }

        let stats = provider.stats();
        assert_eq!(successes, 50);
        assert_eq!(stats.attempts, 200);
        assert_eq!(stats.opened, 150);
        assert_eq!(stats.released, stats.opened);
        assert_eq!(stats.open_transactions, 0);
    }

    #[tokio::test]
    async fn test_preflight() {
        let executor = UnitOfWorkExecutor::new(ScriptedProvider::new());
        assert!(executor.preflight().await.is_ok());
        assert_eq!(executor.provider().stats().released, 1);

        let executor =
            UnitOfWorkExecutor::new(ScriptedProvider::new().with_plan(|_| Some(Injected::Open)));
        assert!(matches!(
            executor.preflight().await,
            Err(WorkloadError::Preflight(StoreError::Connect(_)))
        ));
    }
}
