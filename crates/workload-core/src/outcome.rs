//! The result of one unit of work.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a transaction that reached the store was rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFailure {
    /// Referential or uniqueness constraint rejected the order.
    ConstraintViolation,
    /// The stored logic or the server ran out of something (stock, memory, disk).
    InsufficientResource,
    /// Deadlock or serialization failure between concurrent orders.
    Contention,
    /// The session dropped while the transaction was in flight.
    ConnectionLost,
    /// Any other error reported by the store.
    Other,
}

impl fmt::Display for TransactionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionFailure::ConstraintViolation => write!(f, "constraint violation"),
            TransactionFailure::InsufficientResource => write!(f, "insufficient resource"),
            TransactionFailure::Contention => write!(f, "contention"),
            TransactionFailure::ConnectionLost => write!(f, "connection lost"),
            TransactionFailure::Other => write!(f, "other"),
        }
    }
}

/// Classification of a failed unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No session could be obtained, so no transaction was attempted.
    Connection,
    /// A transaction was attempted and rolled back.
    Transaction(TransactionFailure),
    /// A client-side error that no store behavior explains (e.g. the
    /// result could not be decoded). Rolled back like any other failure.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connection => write!(f, "connection error"),
            ErrorKind::Transaction(failure) => write!(f, "transaction error ({failure})"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Outcome of exactly one executor invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOfWorkOutcome {
    Success { order_id: i64 },
    Failure { kind: ErrorKind },
}

impl UnitOfWorkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UnitOfWorkOutcome::Success { .. })
    }

    /// The order id, only present for successful units of work.
    pub fn order_id(&self) -> Option<i64> {
        match self {
            UnitOfWorkOutcome::Success { order_id } => Some(*order_id),
            UnitOfWorkOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            UnitOfWorkOutcome::Success { .. } => None,
            UnitOfWorkOutcome::Failure { kind } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let ok = UnitOfWorkOutcome::Success { order_id: 7 };
        assert!(ok.is_success());
        assert_eq!(ok.order_id(), Some(7));
        assert_eq!(ok.failure_kind(), None);

        let failed = UnitOfWorkOutcome::Failure {
            kind: ErrorKind::Transaction(TransactionFailure::Contention),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.order_id(), None);
        assert_eq!(
            failed.failure_kind(),
            Some(ErrorKind::Transaction(TransactionFailure::Contention))
        );
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Connection.to_string(), "connection error");
        assert_eq!(
            ErrorKind::Transaction(TransactionFailure::InsufficientResource).to_string(),
            "transaction error (insufficient resource)"
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(UnitOfWorkOutcome::Success { order_id: 3 }).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["order_id"], 3);
    }
}
