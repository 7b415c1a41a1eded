//! Invoice risk evaluation
//!
//! Gathers the issuer's invoice history, runs both scorers, fuses the scores
//! and commits the analysis together with the invoice status.

use crate::config::{EngineConfig, ReviewPolicy};
use crate::constants::{ROUND_PATTERN_WINDOW, SPIKE_HISTORY_WINDOW};
use crate::error::StoreError;
use crate::fusion::{credit_risk_band, decide_status, fraud_risk_band, fuse_scores};
use crate::metrics::EngineMetrics;
use crate::store::{HistoryProvider, RiskAnalysisStore};
use crate::types::{
    HistoricalInvoice, InvoiceStatus, RiskAnalysisRecord, RiskAnalysisResult, ScoreBreakdown,
    ScoringInput,
};
use crate::{Error, Result};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// A newly created invoice together with its issuer's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRiskRequest {
    /// Issuing MSME user
    pub user_id: Uuid,
    /// Invoice under evaluation
    pub invoice_id: Uuid,
    /// Invoice amount
    pub invoice_amount: Decimal,
    /// Issuer's annual turnover
    pub annual_turnover: Decimal,
    /// Issuer's years in business
    pub business_age: f64,
    /// GSTIN verified
    pub gst_verified: bool,
    /// Years the GST registration has been active
    pub gst_active_years: f64,
    /// Buyer GSTIN or other identifier
    pub buyer_identifier: String,
    /// Printed invoice number
    pub invoice_number: Option<String>,
}

impl InvoiceRiskRequest {
    /// Reject inputs the scorers are not meant to see
    pub fn validate(&self) -> Result<()> {
        if self.invoice_amount <= Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "invoice amount must be positive, got {}",
                self.invoice_amount
            )));
        }
        if self.annual_turnover < Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "annual turnover must not be negative, got {}",
                self.annual_turnover
            )));
        }
        if !self.business_age.is_finite() || self.business_age < 0.0 {
            return Err(Error::InvalidInput(format!(
                "business age must be a non-negative number, got {}",
                self.business_age
            )));
        }
        if !self.gst_active_years.is_finite() || self.gst_active_years < 0.0 {
            return Err(Error::InvalidInput(format!(
                "GST active years must be a non-negative number, got {}",
                self.gst_active_years
            )));
        }
        Ok(())
    }

    fn scoring_input(
        &self,
        last6: Vec<HistoricalInvoice>,
        invoice_history: Vec<HistoricalInvoice>,
        has_duplicate: bool,
    ) -> ScoringInput {
        ScoringInput {
            business_age: self.business_age,
            annual_turnover: self.annual_turnover,
            gst_verified: self.gst_verified,
            gst_active_years: self.gst_active_years,
            invoice_amount: self.invoice_amount,
            buyer_identifier: self.buyer_identifier.clone(),
            invoice_number: self.invoice_number.clone(),
            last6_invoices: last6.into_iter().map(|inv| inv.amount).collect(),
            invoice_history,
            has_duplicate,
        }
    }
}

/// Score an assembled input and build the analysis record and status for it.
///
/// Pure: no storage access, so the outcome depends only on the arguments and
/// the creation timestamp/ID of the record.
pub fn build_analysis(
    invoice_id: Uuid,
    input: &ScoringInput,
    policy: &ReviewPolicy,
) -> (RiskAnalysisRecord, InvoiceStatus) {
    let credit = input.credit_score();
    let fraud = input.fraud_score();

    let final_score = fuse_scores(credit.score, fraud.probability);
    let status = decide_status(fraud.score, final_score, policy);

    let record = RiskAnalysisRecord {
        id: Uuid::new_v4(),
        invoice_id,
        credit_score: credit.score,
        fraud_score: fraud.score,
        fraud_probability: fraud.probability,
        final_score,
        credit_risk_band: credit_risk_band(final_score),
        fraud_risk_band: fraud_risk_band(fraud.score),
        breakdown: ScoreBreakdown {
            credit: credit.breakdown,
            fraud: fraud.breakdown,
        },
        created_at: Utc::now(),
    };

    (record, status)
}

/// Risk engine
pub struct RiskEngine {
    history: Arc<dyn HistoryProvider>,
    store: Arc<dyn RiskAnalysisStore>,
    config: EngineConfig,
    metrics: Option<EngineMetrics>,
}

impl RiskEngine {
    /// Create new risk engine
    pub fn new(
        history: Arc<dyn HistoryProvider>,
        store: Arc<dyn RiskAnalysisStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            history,
            store,
            config,
            metrics: None,
        }
    }

    /// Record evaluation outcomes into `metrics`
    pub fn with_metrics(mut self, metrics: EngineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a newly created invoice, persist the analysis and set the
    /// invoice status.
    ///
    /// Storage failures are returned as [`Error::Evaluation`]; nothing is
    /// committed unless both the record and the status are written.
    pub async fn evaluate_invoice_risk(
        &self,
        request: &InvoiceRiskRequest,
    ) -> Result<RiskAnalysisResult> {
        request.validate()?;

        info!(
            "Evaluating risk for invoice {} (user {}, amount {})",
            request.invoice_id, request.user_id, request.invoice_amount
        );

        match self.evaluate(request).await {
            Ok(result) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_evaluation(&result);
                }
                Ok(result)
            }
            Err(e) => {
                error!("Risk evaluation failed for invoice {}: {}", request.invoice_id, e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_failure();
                }
                Err(Error::evaluation(request.invoice_id, e))
            }
        }
    }

    async fn evaluate(
        &self,
        request: &InvoiceRiskRequest,
    ) -> std::result::Result<RiskAnalysisResult, StoreError> {
        let input = self.gather_input(request).await?;

        debug!(
            "Invoice {}: {} recent amounts, {} pattern entries, duplicate={}",
            request.invoice_id,
            input.last6_invoices.len(),
            input.invoice_history.len(),
            input.has_duplicate
        );

        let (record, status) = build_analysis(request.invoice_id, &input, &self.config.review);
        let stored = self.store.commit_analysis(&record, status).await?;

        if status == InvoiceStatus::Pending {
            warn!(
                "Invoice {} held for review: fraud score {}, final score {}",
                request.invoice_id, stored.fraud_score, stored.final_score
            );
        }
        info!(
            "Invoice {} scored: credit {} ({}), fraud {} ({}), final {} -> {}",
            request.invoice_id,
            stored.credit_score,
            stored.credit_risk_band,
            stored.fraud_score,
            stored.fraud_risk_band,
            stored.final_score,
            status
        );

        Ok(RiskAnalysisResult::from_record(&stored, status))
    }

    async fn gather_input(
        &self,
        request: &InvoiceRiskRequest,
    ) -> std::result::Result<ScoringInput, StoreError> {
        let since = Utc::now() - Duration::hours(self.config.duplicate_window_hours);

        let duplicate = async {
            match request.invoice_number.as_deref().map(str::trim) {
                Some(number) if !number.is_empty() => {
                    self.history
                        .find_duplicate_invoice(
                            request.user_id,
                            request.invoice_id,
                            &request.buyer_identifier,
                            number,
                            since,
                        )
                        .await
                }
                _ => Ok(false),
            }
        };

        let (last6, invoice_history, has_duplicate) = tokio::try_join!(
            self.history.find_recent_invoices(
                request.user_id,
                request.invoice_id,
                SPIKE_HISTORY_WINDOW,
            ),
            self.history.find_recent_invoices(
                request.user_id,
                request.invoice_id,
                ROUND_PATTERN_WINDOW,
            ),
            duplicate,
        )?;

        Ok(request.scoring_input(last6, invoice_history, has_duplicate))
    }
}
