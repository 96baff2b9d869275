//! Seam between the workload machinery and a concrete backing store.

use crate::error::StoreError;
use crate::request::OrderRequest;

/// One exclusively owned session to the backing store.
///
/// A session is used by exactly one unit of work and is handed back to its
/// provider once, through [`SessionProvider::release`].
#[async_trait::async_trait]
pub trait OrderSession: Send {
    /// Start a transaction.
    async fn begin(&mut self) -> Result<(), StoreError>;

    /// Invoke the transactional entry point and return the new order id.
    async fn place_order(&mut self, request: &OrderRequest) -> Result<i64, StoreError>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> Result<(), StoreError>;

    /// Roll back the open transaction.
    async fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Produces sessions and takes them back.
///
/// Implementations are shared across execution contexts, so they must be
/// `Send + Sync`; the sessions they hand out are never shared.
///
/// ```ignore
/// let session = provider.open().await?;
/// // ... one unit of work ...
/// provider.release(session).await;
/// ```
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: OrderSession;

    /// Establish (or check out) a session.
    async fn open(&self) -> Result<Self::Session, StoreError>;

    /// End (or check back in) a session. Consumes it so it cannot be reused.
    async fn release(&self, session: Self::Session);
}
