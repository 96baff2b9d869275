//! Error types for the PostgreSQL store.

use thiserror::Error;
use workload_core::{StoreError, TransactionFailure};

/// Errors from the maintenance paths (configuration, init, KPI queries).
#[derive(Error, Debug)]
pub enum PostgreSQLStoreError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQL file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQL directory holds nothing to apply.
    #[error("No .sql files found in {0}")]
    NoSqlFiles(String),
}

/// Map a SQLSTATE code to the failure class counted for it.
pub fn failure_for_sqlstate(code: &str) -> TransactionFailure {
    match code {
        // serialization_failure, deadlock_detected, lock_not_available
        "40001" | "40P01" | "55P03" => TransactionFailure::Contention,
        // raise_exception: stored logic refusing the order (e.g. out of stock)
        "P0001" => TransactionFailure::InsufficientResource,
        // admin_shutdown, crash_shutdown, cannot_connect_now
        "57P01" | "57P02" | "57P03" => TransactionFailure::ConnectionLost,
        _ if code.starts_with("23") => TransactionFailure::ConstraintViolation,
        _ if code.starts_with("53") => TransactionFailure::InsufficientResource,
        _ if code.starts_with("08") => TransactionFailure::ConnectionLost,
        _ => TransactionFailure::Other,
    }
}

/// Classify an error raised while a transaction is in progress.
///
/// Errors with a SQLSTATE came from the server; a closed or broken socket
/// means the session was lost; anything else happened on the client side.
pub fn classify_error(err: &tokio_postgres::Error) -> StoreError {
    if let Some(code) = err.code() {
        let message = err
            .as_db_error()
            .map(|db| db.message().to_string())
            .unwrap_or_else(|| err.to_string());
        return StoreError::transaction(failure_for_sqlstate(code.code()), message);
    }

    if err.is_closed() || is_io_error(err) {
        return StoreError::transaction(TransactionFailure::ConnectionLost, err.to_string());
    }

    StoreError::Unexpected(err.to_string())
}

fn is_io_error(err: &tokio_postgres::Error) -> bool {
    std::error::Error::source(err)
        .map(|source| source.is::<std::io::Error>())
        .unwrap_or(false)
}
