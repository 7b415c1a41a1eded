//! Core types for the invoice risk engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single scored factor with the reasoning behind it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Points contributed
    pub score: u32,
    /// Human-readable explanation including the raw values used
    pub reason: String,
}

impl ScoreEntry {
    /// Create a breakdown entry
    pub fn new(score: u32, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
        }
    }
}

/// Credit score components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBreakdown {
    /// Business age band
    pub age_score: ScoreEntry,
    /// Annual turnover band
    pub turnover_score: ScoreEntry,
    /// GST verification trust
    pub gst_score: ScoreEntry,
    /// Invoice-to-turnover exposure band
    pub exposure_score: ScoreEntry,
}

impl CreditBreakdown {
    /// Sum of all component points (before clamping)
    pub fn total(&self) -> u32 {
        self.age_score.score
            + self.turnover_score.score
            + self.gst_score.score
            + self.exposure_score.score
    }
}

/// Trustworthiness score (0-100, higher is safer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScoreResult {
    /// Clamped score
    pub score: u32,
    /// Per-component breakdown
    pub breakdown: CreditBreakdown,
}

/// Fraud score components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudBreakdown {
    /// Invoice-to-turnover ratio risk
    pub ratio_risk: ScoreEntry,
    /// Spike against the recent invoice average
    pub spike_risk: ScoreEntry,
    /// Round-amount pattern
    pub round_risk: ScoreEntry,
    /// Invoice larger than the business age supports
    pub age_mismatch_risk: ScoreEntry,
    /// Same buyer and invoice number seen recently
    pub duplicate_risk: ScoreEntry,
}

impl FraudBreakdown {
    /// Sum of all component points (before clamping)
    pub fn total(&self) -> u32 {
        self.ratio_risk.score
            + self.spike_risk.score
            + self.round_risk.score
            + self.age_mismatch_risk.score
            + self.duplicate_risk.score
    }
}

/// Suspicion score (0-100, higher is more suspicious)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudScoreResult {
    /// Clamped score
    pub score: u32,
    /// `score / 100`
    pub probability: f64,
    /// Per-component breakdown
    pub breakdown: FraudBreakdown,
}

/// A past invoice amount as seen by the fraud heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalInvoice {
    /// Invoice amount
    pub amount: Decimal,
}

impl HistoricalInvoice {
    /// Create a history entry
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }
}

/// Everything both scorers need for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringInput {
    /// Years in business
    pub business_age: f64,
    /// Annual turnover
    pub annual_turnover: Decimal,
    /// GSTIN verified
    pub gst_verified: bool,
    /// Years the GST registration has been active
    pub gst_active_years: f64,
    /// Amount of the invoice under evaluation
    pub invoice_amount: Decimal,
    /// Buyer GSTIN or other buyer identifier
    pub buyer_identifier: String,
    /// Invoice number printed on the invoice
    pub invoice_number: Option<String>,
    /// Up to six most recent invoice amounts, most recent first
    pub last6_invoices: Vec<Decimal>,
    /// Up to three most recent invoices, most recent first
    pub invoice_history: Vec<HistoricalInvoice>,
    /// Same buyer and invoice number seen within the duplicate window
    pub has_duplicate: bool,
}

impl ScoringInput {
    /// Run the credit scorer over this input
    pub fn credit_score(&self) -> CreditScoreResult {
        crate::credit::compute_credit_score(
            self.business_age,
            self.annual_turnover,
            self.gst_verified,
            self.gst_active_years,
            self.invoice_amount,
        )
    }

    /// Run the fraud scorer over this input
    pub fn fraud_score(&self) -> FraudScoreResult {
        crate::fraud::compute_fraud_score(
            self.invoice_amount,
            self.annual_turnover,
            self.business_age,
            &self.last6_invoices,
            &self.invoice_history,
            self.has_duplicate,
        )
    }
}

/// Credit risk label derived from the fused final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditRiskBand {
    /// 0-39
    #[serde(rename = "Very High Risk")]
    VeryHighRisk,
    /// 40-59
    #[serde(rename = "High Risk")]
    HighRisk,
    /// 60-79
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    /// 80-100
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl CreditRiskBand {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CreditRiskBand::VeryHighRisk => "Very High Risk",
            CreditRiskBand::HighRisk => "High Risk",
            CreditRiskBand::ModerateRisk => "Moderate Risk",
            CreditRiskBand::LowRisk => "Low Risk",
        }
    }
}

impl fmt::Display for CreditRiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fraud risk label derived from the raw fraud score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudRiskBand {
    /// 0-20
    #[serde(rename = "Safe")]
    Safe,
    /// 21-40
    #[serde(rename = "Low Suspicion")]
    LowSuspicion,
    /// 41-60
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    /// 61-80
    #[serde(rename = "High Risk")]
    HighRisk,
    /// 81-100
    #[serde(rename = "Critical Risk")]
    CriticalRisk,
}

impl FraudRiskBand {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FraudRiskBand::Safe => "Safe",
            FraudRiskBand::LowSuspicion => "Low Suspicion",
            FraudRiskBand::MediumRisk => "Medium Risk",
            FraudRiskBand::HighRisk => "High Risk",
            FraudRiskBand::CriticalRisk => "Critical Risk",
        }
    }
}

impl fmt::Display for FraudRiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Invoice status written by the engine after evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Held for manual review
    Pending,
    /// Eligible for the funding marketplace
    Verified,
}

impl InvoiceStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Verified => "VERIFIED",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both scorer breakdowns, persisted as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Credit scorer components
    pub credit: CreditBreakdown,
    /// Fraud scorer components
    pub fraud: FraudBreakdown,
}

/// Persisted analysis, one per invoice, never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysisRecord {
    /// Record ID
    pub id: Uuid,
    /// Invoice the analysis belongs to (unique)
    pub invoice_id: Uuid,
    /// Raw credit score
    pub credit_score: u32,
    /// Raw fraud score
    pub fraud_score: u32,
    /// `fraud_score / 100`
    pub fraud_probability: f64,
    /// Fraud-adjusted credit score
    pub final_score: u32,
    /// Label of the final score
    pub credit_risk_band: CreditRiskBand,
    /// Label of the fraud score
    pub fraud_risk_band: FraudRiskBand,
    /// Both breakdowns
    #[serde(rename = "breakdownJSON")]
    pub breakdown: ScoreBreakdown,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Outcome of an invoice evaluation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysisResult {
    /// Raw credit score
    pub credit_score: u32,
    /// Raw fraud score
    pub fraud_score: u32,
    /// `fraud_score / 100`
    pub fraud_probability: f64,
    /// Fraud-adjusted credit score
    pub final_score: u32,
    /// Label of the final score
    pub credit_risk_band: CreditRiskBand,
    /// Label of the fraud score
    pub fraud_risk_band: FraudRiskBand,
    /// Both breakdowns
    pub breakdown: ScoreBreakdown,
    /// Status written to the invoice
    pub status: InvoiceStatus,
}

impl RiskAnalysisResult {
    /// Build the caller-facing result from a stored record
    pub fn from_record(record: &RiskAnalysisRecord, status: InvoiceStatus) -> Self {
        Self {
            credit_score: record.credit_score,
            fraud_score: record.fraud_score,
            fraud_probability: record.fraud_probability,
            final_score: record.final_score,
            credit_risk_band: record.credit_risk_band,
            fraud_risk_band: record.fraud_risk_band,
            breakdown: record.breakdown.clone(),
            status,
        }
    }
}
