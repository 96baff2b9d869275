//! In-memory backing store for exercising the runner without PostgreSQL.
//!
//! [`ScriptedProvider`] hands out sessions whose behavior is decided by a
//! plan keyed on the global attempt number, and keeps counters that let
//! tests check session and transaction accounting.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use workload_core::{OrderRequest, OrderSession, SessionProvider, StoreError, TransactionFailure};

/// Failure to inject into one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injected {
    /// `open` fails; no session is handed out.
    Open,
    /// `BEGIN` fails.
    Begin(TransactionFailure),
    /// `place_order` fails inside the transaction.
    PlaceOrder(TransactionFailure),
    /// `COMMIT` fails (e.g. acknowledgement lost).
    Commit(TransactionFailure),
    /// `place_order` returns something the client cannot decode.
    Unexpected,
}

type Plan = dyn Fn(u64) -> Option<Injected> + Send + Sync;

/// Snapshot of the provider counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStats {
    /// Calls to `open`, successful or not.
    pub attempts: u64,
    pub opened: u64,
    pub released: u64,
    pub committed: u64,
    pub rolled_back: u64,
    /// Transactions begun and not yet committed or rolled back.
    pub open_transactions: i64,
}

#[derive(Default)]
struct Counters {
    attempts: AtomicU64,
    opened: AtomicU64,
    released: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
    open_transactions: AtomicI64,
    next_order_id: AtomicI64,
}

struct Shared {
    plan: Option<Arc<Plan>>,
    latency: Duration,
    counters: Counters,
    requests: Mutex<Vec<OrderRequest>>,
}

/// Scripted, thread-safe [`SessionProvider`].
#[derive(Clone)]
pub struct ScriptedProvider {
    shared: Arc<Shared>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    /// Every attempt succeeds immediately.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                plan: None,
                latency: Duration::ZERO,
                counters: Counters::default(),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Decide per attempt number (starting at 0) whether and where to fail.
    pub fn with_plan<F>(self, plan: F) -> Self
    where
        F: Fn(u64) -> Option<Injected> + Send + Sync + 'static,
    {
        let plan: Arc<Plan> = Arc::new(plan);
        self.rebuild(Some(plan), None)
    }

    /// Make every `place_order` call take this long.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.rebuild(None, Some(latency))
    }

    fn rebuild(self, plan: Option<Arc<Plan>>, latency: Option<Duration>) -> Self {
        Self {
            shared: Arc::new(Shared {
                plan: plan.or_else(|| self.shared.plan.clone()),
                latency: latency.unwrap_or(self.shared.latency),
                counters: Counters::default(),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn stats(&self) -> ProviderStats {
        let c = &self.shared.counters;
        ProviderStats {
            attempts: c.attempts.load(Ordering::SeqCst),
            opened: c.opened.load(Ordering::SeqCst),
            released: c.released.load(Ordering::SeqCst),
            committed: c.committed.load(Ordering::SeqCst),
            rolled_back: c.rolled_back.load(Ordering::SeqCst),
            open_transactions: c.open_transactions.load(Ordering::SeqCst),
        }
    }

    /// Requests that reached `place_order`, in arrival order.
    pub fn requests(&self) -> Vec<OrderRequest> {
        self.shared
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

/// Session handed out by [`ScriptedProvider`].
pub struct ScriptedSession {
    shared: Arc<Shared>,
    injected: Option<Injected>,
    in_transaction: bool,
}

impl ScriptedSession {
    fn end_transaction(&mut self) {
        if self.in_transaction {
            self.in_transaction = false;
            self.shared
                .counters
                .open_transactions
                .fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait::async_trait]
impl OrderSession for ScriptedSession {
    async fn begin(&mut self) -> Result<(), StoreError> {
        if let Some(Injected::Begin(failure)) = self.injected {
            return Err(StoreError::transaction(failure, "injected begin failure"));
        }
        self.in_transaction = true;
        self.shared
            .counters
            .open_transactions
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn place_order(&mut self, request: &OrderRequest) -> Result<i64, StoreError> {
        if !self.shared.latency.is_zero() {
            tokio::time::sleep(self.shared.latency).await;
        }
        if let Ok(mut requests) = self.shared.requests.lock() {
            requests.push(*request);
        }
        match self.injected {
            Some(Injected::PlaceOrder(failure)) => {
                Err(StoreError::transaction(failure, "injected place_order failure"))
            }
            Some(Injected::Unexpected) => {
                Err(StoreError::Unexpected("injected decode failure".to_string()))
            }
            _ => Ok(self
                .shared
                .counters
                .next_order_id
                .fetch_add(1, Ordering::SeqCst)
                + 1),
        }
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.end_transaction();
        if let Some(Injected::Commit(failure)) = self.injected {
            return Err(StoreError::transaction(failure, "injected commit failure"));
        }
        self.shared.counters.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.end_transaction();
        self.shared
            .counters
            .rolled_back
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionProvider for ScriptedProvider {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession, StoreError> {
        let attempt = self
            .shared
            .counters
            .attempts
            .fetch_add(1, Ordering::SeqCst);
        let injected = self.shared.plan.as_ref().and_then(|plan| plan(attempt));

        if injected == Some(Injected::Open) {
            return Err(StoreError::Connect("injected connection failure".to_string()));
        }

        self.shared.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            shared: Arc::clone(&self.shared),
            injected,
            in_transaction: false,
        })
    }

    async fn release(&self, session: ScriptedSession) {
        self.shared.counters.released.fetch_add(1, Ordering::SeqCst);
        drop(session);
    }
}
