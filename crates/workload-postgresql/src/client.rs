//! PostgreSQL client utilities.

use crate::config::ConnectionConfig;
use tokio_postgres::{Client, NoTls};
use tracing::warn;

/// Open a new client and spawn its connection task.
///
/// The connection task ends on its own once the returned client is dropped.
pub async fn connect(config: &ConnectionConfig) -> Result<Client, tokio_postgres::Error> {
    let (client, connection) = config.to_pg_config().connect(NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            warn!("PostgreSQL connection error: {}", e);
        }
    });

    Ok(client)
}
