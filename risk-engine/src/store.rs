//! Storage collaborators
//!
//! The engine never touches a database handle directly. Invoice history is
//! read through [`HistoryProvider`] and the analysis is written through
//! [`RiskAnalysisStore`], so the orchestrator can be driven by fakes in tests.

use crate::error::StoreError;
use crate::types::{HistoricalInvoice, InvoiceStatus, RiskAnalysisRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage result type
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read access to a user's invoice history
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Most recent invoices of `user_id` excluding `exclude_invoice_id`,
    /// newest first, at most `limit` entries
    async fn find_recent_invoices(
        &self,
        user_id: Uuid,
        exclude_invoice_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<HistoricalInvoice>>;

    /// Whether another invoice of `user_id` with the same buyer and invoice
    /// number was created at or after `since`
    async fn find_duplicate_invoice(
        &self,
        user_id: Uuid,
        exclude_invoice_id: Uuid,
        buyer_identifier: &str,
        invoice_number: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<bool>;
}

/// Write access for finished analyses
#[async_trait]
pub trait RiskAnalysisStore: Send + Sync {
    /// Persist `record` and set the invoice status as one atomic unit.
    ///
    /// Either both changes are applied or neither is. A second record for the
    /// same invoice is rejected with [`StoreError::AnalysisExists`].
    async fn commit_analysis(
        &self,
        record: &RiskAnalysisRecord,
        status: InvoiceStatus,
    ) -> StoreResult<RiskAnalysisRecord>;
}
