//! One PostgreSQL session used by one unit of work.

use crate::error::classify_error;
use tokio_postgres::{Client, Row};
use workload_core::{OrderRequest, OrderSession, StoreError};

/// Calls the stored transactional entry point.
pub const PLACE_ORDER_SQL: &str = "SELECT place_order($1::int, $2::int, $3::int)";

/// An exclusively owned client plus its transaction state.
pub struct PostgreSQLSession {
    client: Client,
    in_transaction: bool,
}

impl PostgreSQLSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_transaction: false,
        }
    }

    /// Whether a transaction was begun and not yet committed or rolled back.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    /// A session may go back to the idle pool only if it is clean and alive.
    pub fn is_reusable(&self) -> bool {
        !self.in_transaction && !self.client.is_closed()
    }
}

#[async_trait::async_trait]
impl OrderSession for PostgreSQLSession {
    async fn begin(&mut self) -> Result<(), StoreError> {
        self.client
            .batch_execute("BEGIN")
            .await
            .map_err(|e| classify_error(&e))?;
        self.in_transaction = true;
        Ok(())
    }

    async fn place_order(&mut self, request: &OrderRequest) -> Result<i64, StoreError> {
        let row = self
            .client
            .query_one(
                PLACE_ORDER_SQL,
                &[&request.customer_id, &request.product_id, &request.quantity],
            )
            .await
            .map_err(|e| classify_error(&e))?;
        decode_order_id(&row)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let result = self.client.batch_execute("COMMIT").await;
        // Success or not, the server no longer has this transaction open
        // unless the socket died, in which case the session is discarded.
        self.in_transaction = false;
        result.map_err(|e| classify_error(&e))
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.client
            .batch_execute("ROLLBACK")
            .await
            .map_err(|e| classify_error(&e))?;
        self.in_transaction = false;
        Ok(())
    }
}

/// `place_order` may be declared to return `integer` or `bigint`.
fn decode_order_id(row: &Row) -> Result<i64, StoreError> {
    if let Ok(order_id) = row.try_get::<_, i64>(0) {
        return Ok(order_id);
    }
    row.try_get::<_, i32>(0)
        .map(i64::from)
        .map_err(|e| StoreError::Unexpected(format!("cannot decode order id: {e}")))
}
