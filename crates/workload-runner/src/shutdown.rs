//! Cooperative cancellation.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{error, info};

/// Receiving side of a shutdown signal.
///
/// Once a signal has been observed it stays observed. A dropped sender
/// without a signal means shutdown will never be requested.
pub struct Shutdown {
    receiver: broadcast::Receiver<()>,
    triggered: bool,
}

impl Shutdown {
    pub fn new(receiver: broadcast::Receiver<()>) -> Self {
        Self {
            receiver,
            triggered: false,
        }
    }

    /// A sender/receiver pair; send `()` on the sender to request shutdown.
    pub fn channel() -> (broadcast::Sender<()>, Shutdown) {
        let (sender, receiver) = broadcast::channel(1);
        (sender, Shutdown::new(receiver))
    }

    /// Shutdown that is never requested.
    pub fn never() -> Self {
        let (_, shutdown) = Self::channel();
        shutdown
    }

    /// Non-blocking check, used between units of work.
    pub fn is_triggered(&mut self) -> bool {
        if !self.triggered {
            match self.receiver.try_recv() {
                Ok(()) | Err(TryRecvError::Lagged(_)) => self.triggered = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => {}
            }
        }
        self.triggered
    }

    /// Wait until shutdown is requested. Cancel safe.
    pub async fn recv(&mut self) {
        if self.triggered {
            return;
        }
        match self.receiver.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => self.triggered = true,
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}

/// Sets up a shutdown signal handler fed by Ctrl+C.
pub fn ctrl_c_shutdown() -> Shutdown {
    let (shutdown_tx, shutdown) = Shutdown::channel();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received interrupt signal (Ctrl+C)");
                let _ = shutdown_tx.send(());
            }
            Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
        }
    });

    shutdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_is_latched() {
        let (tx, mut shutdown) = Shutdown::channel();
        assert!(!shutdown.is_triggered());

        tx.send(()).unwrap();
        assert!(shutdown.is_triggered());
        // Still triggered after the message was consumed.
        assert!(shutdown.is_triggered());
        shutdown.recv().await;
    }

    #[tokio::test]
    async fn test_recv_wakes_on_signal() {
        let (tx, mut shutdown) = Shutdown::channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = tx.send(());
        });

        tokio::time::timeout(Duration::from_secs(5), shutdown.recv())
            .await
            .expect("shutdown should be observed");
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_never_does_not_fire() {
        let mut shutdown = Shutdown::never();
        assert!(!shutdown.is_triggered());

        let waited = tokio::time::timeout(Duration::from_millis(50), shutdown.recv()).await;
        assert!(waited.is_err());
        assert!(!shutdown.is_triggered());
    }
}
