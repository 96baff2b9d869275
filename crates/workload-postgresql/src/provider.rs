//! Connection provider for the PostgreSQL store.

use crate::client::connect;
use crate::config::ConnectionConfig;
use crate::session::PostgreSQLSession;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use workload_core::{SessionProvider, StoreError};

/// Opens sessions against one PostgreSQL endpoint.
///
/// By default every call to [`open`](SessionProvider::open) establishes a
/// brand new connection and [`release`](SessionProvider::release) closes it,
/// modelling many independent clients. With a non-zero pool size, clean
/// sessions are parked on release and handed out again by later opens.
pub struct PostgreSQLProvider {
    config: ConnectionConfig,
    pool: Option<IdleSessions>,
}

struct IdleSessions {
    sessions: Mutex<Vec<PostgreSQLSession>>,
    capacity: usize,
}

impl PostgreSQLProvider {
    /// One fresh connection per unit of work.
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config, pool: None }
    }

    /// Reuse up to `pool_size` idle sessions. Zero disables reuse.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool = (pool_size > 0).then(|| IdleSessions {
            sessions: Mutex::new(Vec::with_capacity(pool_size)),
            capacity: pool_size,
        });
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    /// Number of sessions currently parked for reuse.
    pub async fn idle_sessions(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.sessions.lock().await.len(),
            None => 0,
        }
    }

    async fn checkout_idle(&self) -> Option<PostgreSQLSession> {
        let pool = self.pool.as_ref()?;
        let mut sessions = pool.sessions.lock().await;
        while let Some(session) = sessions.pop() {
            if session.is_reusable() {
                return Some(session);
            }
            debug!("Dropping idle session that closed while parked");
        }
        None
    }
}

#[async_trait::async_trait]
impl SessionProvider for PostgreSQLProvider {
    type Session = PostgreSQLSession;

    async fn open(&self) -> Result<PostgreSQLSession, StoreError> {
        if let Some(session) = self.checkout_idle().await {
            return Ok(session);
        }

        let client = connect(&self.config)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        Ok(PostgreSQLSession::new(client))
    }

    async fn release(&self, session: PostgreSQLSession) {
        let Some(pool) = &self.pool else {
            // Dropping the client closes the connection.
            drop(session);
            return;
        };

        if !session.is_reusable() {
            if session.in_transaction() {
                warn!("Discarding session with an unresolved transaction");
            }
            return;
        }

        let mut sessions = pool.sessions.lock().await;
        if sessions.len() < pool.capacity {
            sessions.push(session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("localhost", 5432, Some("postgres".into()), None, "postgres")
            .unwrap()
    }

    #[tokio::test]
    async fn test_default_is_connection_per_call() {
        let provider = PostgreSQLProvider::new(config());
        assert!(!provider.is_pooled());
        assert_eq!(provider.idle_sessions().await, 0);
    }

    #[test]
    fn test_zero_pool_size_disables_pooling() {
        let provider = PostgreSQLProvider::new(config()).with_pool_size(0);
        assert!(!provider.is_pooled());

        let provider = PostgreSQLProvider::new(config()).with_pool_size(8);
        assert!(provider.is_pooled());
        assert_eq!(tokio_test::block_on(provider.idle_sessions()), 0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_connection_error() {
        // Port 1 on loopback refuses connections.
        let config =
            ConnectionConfig::new("127.0.0.1", 1, Some("postgres".into()), None, "postgres")
                .unwrap();
        let provider = PostgreSQLProvider::new(config);

        let err = provider.open().await.err().expect("open should fail");
        assert!(matches!(err, StoreError::Connect(_)));
    }
}
