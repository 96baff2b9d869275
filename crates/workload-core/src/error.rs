//! Errors reported by a backing store implementation.

use crate::outcome::{ErrorKind, TransactionFailure};
use thiserror::Error;

/// Errors that can occur while talking to the backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A session could not be established.
    #[error("Connection error: {0}")]
    Connect(String),

    /// The store rejected or lost the transaction.
    #[error("Transaction error ({failure}): {message}")]
    Transaction {
        failure: TransactionFailure,
        message: String,
    },

    /// Client-side failure not attributable to the store.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl StoreError {
    pub fn transaction(failure: TransactionFailure, message: impl Into<String>) -> Self {
        StoreError::Transaction {
            failure,
            message: message.into(),
        }
    }

    /// The outcome classification this error maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Connect(_) => ErrorKind::Connection,
            StoreError::Transaction { failure, .. } => ErrorKind::Transaction(*failure),
            StoreError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            StoreError::Connect("refused".into()).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            StoreError::transaction(TransactionFailure::ConstraintViolation, "fk").kind(),
            ErrorKind::Transaction(TransactionFailure::ConstraintViolation)
        );
        assert_eq!(
            StoreError::Unexpected("decode".into()).kind(),
            ErrorKind::Unexpected
        );
    }
}
