//! In-memory invoice store
//!
//! Implements both storage traits over a single lock so that the analysis
//! record and the invoice status always change together.

use crate::error::StoreError;
use crate::store::{HistoryProvider, RiskAnalysisStore, StoreResult};
use crate::types::{HistoricalInvoice, InvoiceStatus, RiskAnalysisRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Invoice row as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredInvoice {
    /// Invoice ID
    pub id: Uuid,
    /// Owning MSME user
    pub user_id: Uuid,
    /// Invoice amount
    pub amount: Decimal,
    /// Buyer GSTIN or other identifier
    pub buyer_identifier: String,
    /// Printed invoice number
    pub invoice_number: Option<String>,
    /// Status set by the last evaluation, `None` until evaluated
    pub status: Option<InvoiceStatus>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl StoredInvoice {
    /// New unevaluated invoice created now
    pub fn new(user_id: Uuid, amount: Decimal, buyer_identifier: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            buyer_identifier: buyer_identifier.into(),
            invoice_number: None,
            status: None,
            created_at: Utc::now(),
        }
    }

    /// Set the printed invoice number
    pub fn with_invoice_number(mut self, invoice_number: impl Into<String>) -> Self {
        self.invoice_number = Some(invoice_number.into());
        self
    }

    /// Override the creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

#[derive(Default)]
struct State {
    invoices: HashMap<Uuid, StoredInvoice>,
    // invoice_id -> analysis
    analyses: HashMap<Uuid, RiskAnalysisRecord>,
}

/// Thread-safe in-memory store
#[derive(Default)]
pub struct InMemoryInvoiceStore {
    state: RwLock<State>,
}

impl InMemoryInvoiceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an invoice, replacing any invoice with the same ID
    pub fn insert_invoice(&self, invoice: StoredInvoice) {
        self.state.write().invoices.insert(invoice.id, invoice);
    }

    /// Look up an invoice
    pub fn invoice(&self, invoice_id: Uuid) -> Option<StoredInvoice> {
        self.state.read().invoices.get(&invoice_id).cloned()
    }

    /// Current status of an invoice
    pub fn status(&self, invoice_id: Uuid) -> Option<InvoiceStatus> {
        self.state
            .read()
            .invoices
            .get(&invoice_id)
            .and_then(|invoice| invoice.status)
    }

    /// Stored analysis for an invoice
    pub fn analysis(&self, invoice_id: Uuid) -> Option<RiskAnalysisRecord> {
        self.state.read().analyses.get(&invoice_id).cloned()
    }

    /// Number of stored analyses
    pub fn analysis_count(&self) -> usize {
        self.state.read().analyses.len()
    }
}

#[async_trait]
impl HistoryProvider for InMemoryInvoiceStore {
    async fn find_recent_invoices(
        &self,
        user_id: Uuid,
        exclude_invoice_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<HistoricalInvoice>> {
        let state = self.state.read();
        let mut invoices: Vec<&StoredInvoice> = state
            .invoices
            .values()
            .filter(|inv| inv.user_id == user_id && inv.id != exclude_invoice_id)
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(invoices
            .into_iter()
            .take(limit)
            .map(|inv| HistoricalInvoice::new(inv.amount))
            .collect())
    }

    async fn find_duplicate_invoice(
        &self,
        user_id: Uuid,
        exclude_invoice_id: Uuid,
        buyer_identifier: &str,
        invoice_number: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let state = self.state.read();
        Ok(state.invoices.values().any(|inv| {
            inv.user_id == user_id
                && inv.id != exclude_invoice_id
                && inv.buyer_identifier == buyer_identifier
                && inv.invoice_number.as_deref() == Some(invoice_number)
                && inv.created_at >= since
        }))
    }
}

#[async_trait]
impl RiskAnalysisStore for InMemoryInvoiceStore {
    async fn commit_analysis(
        &self,
        record: &RiskAnalysisRecord,
        status: InvoiceStatus,
    ) -> StoreResult<RiskAnalysisRecord> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        if state.analyses.contains_key(&record.invoice_id) {
            return Err(StoreError::AnalysisExists(record.invoice_id));
        }
        let invoice = state
            .invoices
            .get_mut(&record.invoice_id)
            .ok_or(StoreError::InvoiceNotFound(record.invoice_id))?;

        invoice.status = Some(status);
        state.analyses.insert(record.invoice_id, record.clone());

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreditBreakdown, CreditRiskBand, FraudBreakdown, FraudRiskBand};
    use crate::types::{ScoreBreakdown, ScoreEntry};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn record_for(invoice_id: Uuid) -> RiskAnalysisRecord {
        RiskAnalysisRecord {
            id: Uuid::new_v4(),
            invoice_id,
            credit_score: 70,
            fraud_score: 0,
            fraud_probability: 0.0,
            final_score: 70,
            credit_risk_band: CreditRiskBand::ModerateRisk,
            fraud_risk_band: FraudRiskBand::Safe,
            breakdown: ScoreBreakdown {
                credit: CreditBreakdown {
                    age_score: ScoreEntry::default(),
                    turnover_score: ScoreEntry::default(),
                    gst_score: ScoreEntry::default(),
                    exposure_score: ScoreEntry::default(),
                },
                fraud: FraudBreakdown {
                    ratio_risk: ScoreEntry::default(),
                    spike_risk: ScoreEntry::default(),
                    round_risk: ScoreEntry::default(),
                    age_mismatch_risk: ScoreEntry::default(),
                    duplicate_risk: ScoreEntry::default(),
                },
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_recent_invoices_newest_first() {
        let store = InMemoryInvoiceStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();

        for (hours_ago, amount) in [(3, dec!(300)), (1, dec!(100)), (2, dec!(200))] {
            store.insert_invoice(
                StoredInvoice::new(user, amount, "BUYER").created_at(now - Duration::hours(hours_ago)),
            );
        }
        let current = StoredInvoice::new(user, dec!(999), "BUYER");
        let current_id = current.id;
        store.insert_invoice(current);
        store.insert_invoice(StoredInvoice::new(Uuid::new_v4(), dec!(5), "OTHER"));

        let recent = store.find_recent_invoices(user, current_id, 2).await.unwrap();
        let amounts: Vec<Decimal> = recent.iter().map(|inv| inv.amount).collect();
        assert_eq!(amounts, vec![dec!(100), dec!(200)]);
    }

    #[tokio::test]
    async fn test_duplicate_lookup_respects_window() {
        let store = InMemoryInvoiceStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();

        store.insert_invoice(
            StoredInvoice::new(user, dec!(100), "27AAAAA0000A1Z5")
                .with_invoice_number("INV-1")
                .created_at(now - Duration::hours(30)),
        );
        let since = now - Duration::hours(24);

        let found = store
            .find_duplicate_invoice(user, Uuid::new_v4(), "27AAAAA0000A1Z5", "INV-1", since)
            .await
            .unwrap();
        assert!(!found);

        store.insert_invoice(
            StoredInvoice::new(user, dec!(100), "27AAAAA0000A1Z5")
                .with_invoice_number("INV-1")
                .created_at(now - Duration::hours(2)),
        );
        let found = store
            .find_duplicate_invoice(user, Uuid::new_v4(), "27AAAAA0000A1Z5", "INV-1", since)
            .await
            .unwrap();
        assert!(found);
    }

    #[tokio::test]
    async fn test_commit_is_all_or_nothing() {
        let store = InMemoryInvoiceStore::new();
        let missing = Uuid::new_v4();

        let err = store
            .commit_analysis(&record_for(missing), InvoiceStatus::Verified)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvoiceNotFound(id) if id == missing));
        assert_eq!(store.analysis_count(), 0);

        let invoice = StoredInvoice::new(Uuid::new_v4(), dec!(100), "BUYER");
        let invoice_id = invoice.id;
        store.insert_invoice(invoice);

        store
            .commit_analysis(&record_for(invoice_id), InvoiceStatus::Verified)
            .await
            .unwrap();
        assert_eq!(store.status(invoice_id), Some(InvoiceStatus::Verified));

        let err = store
            .commit_analysis(&record_for(invoice_id), InvoiceStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AnalysisExists(_)));
        assert_eq!(store.status(invoice_id), Some(InvoiceStatus::Verified));
        assert_eq!(store.analysis_count(), 1);
    }
}
