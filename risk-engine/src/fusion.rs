//! Score fusion and classification

use crate::config::ReviewPolicy;
use crate::constants::{CREDIT_RISK_LABELS, FRAUD_RISK_LABELS, MAX_SCORE};
use crate::types::{CreditRiskBand, FraudRiskBand, InvoiceStatus};

/// Fraud-adjusted credit score: `round(credit * (1 - fraud_probability))`
pub fn fuse_scores(credit_score: u32, fraud_probability: f64) -> u32 {
    let fused = (f64::from(credit_score) * (1.0 - fraud_probability)).round();
    fused.clamp(0.0, f64::from(MAX_SCORE)) as u32
}

/// Credit band of the fused final score (not the raw credit score)
pub fn credit_risk_band(final_score: u32) -> CreditRiskBand {
    CREDIT_RISK_LABELS.lookup(f64::from(final_score))
}

/// Fraud band of the raw fraud score
pub fn fraud_risk_band(fraud_score: u32) -> FraudRiskBand {
    FRAUD_RISK_LABELS.lookup(f64::from(fraud_score))
}

/// Hold the invoice for review when fraud is high or the final score is low
pub fn decide_status(fraud_score: u32, final_score: u32, policy: &ReviewPolicy) -> InvoiceStatus {
    if fraud_score >= policy.fraud_review_threshold || final_score < policy.final_score_floor {
        InvoiceStatus::Pending
    } else {
        InvoiceStatus::Verified
    }
}
