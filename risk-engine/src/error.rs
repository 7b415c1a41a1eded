//! Error types for the invoice risk engine

use thiserror::Error;
use uuid::Uuid;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// History retrieval or persistence failed while evaluating an invoice
    #[error("Risk evaluation failed for invoice {invoice_id}: {source}")]
    Evaluation {
        /// Invoice being evaluated
        invoice_id: Uuid,
        /// Underlying storage failure
        #[source]
        source: StoreError,
    },

    /// Scoring input rejected before evaluation
    #[error("Invalid scoring input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap a storage failure for the given invoice
    pub fn evaluation(invoice_id: Uuid, source: StoreError) -> Self {
        Error::Evaluation { invoice_id, source }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by history and analysis storage
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invoice does not exist in the store
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// A risk analysis was already recorded for the invoice
    #[error("Risk analysis already exists for invoice {0}")]
    AnalysisExists(Uuid),

    /// Read query failed
    #[error("Query failed: {0}")]
    Query(String),

    /// Atomic write failed and was rolled back
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Database driver error
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_evaluation_error_keeps_cause() {
        let invoice_id = Uuid::new_v4();
        let err = Error::evaluation(invoice_id, StoreError::Query("connection reset".into()));

        assert!(err.to_string().contains(&invoice_id.to_string()));
        let cause = err.source().expect("cause attached");
        assert_eq!(cause.to_string(), "Query failed: connection reset");
    }
}
