//! Credit scoring
//!
//! Four independent additive components (business age, turnover, GST trust and
//! invoice exposure) summed and clamped to 0-100. Pure and deterministic.

use crate::constants::{
    AGE_BANDS, EXPOSURE_BANDS, GST_ESTABLISHED_POINTS, GST_ESTABLISHED_YEARS, GST_NEW_POINTS,
    MAX_SCORE, TURNOVER_BANDS,
};
use crate::types::{CreditBreakdown, CreditScoreResult, ScoreEntry};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Invoice amount divided by annual turnover.
///
/// A zero turnover gives `f64::INFINITY`, which lands in the open-ended band
/// of every ratio table.
pub fn exposure_ratio(invoice_amount: Decimal, annual_turnover: Decimal) -> f64 {
    if annual_turnover.is_zero() {
        return f64::INFINITY;
    }
    to_f64(invoice_amount) / to_f64(annual_turnover)
}

/// Lossy conversion used wherever an amount meets a floating-point band
pub(crate) fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(f64::NAN)
}

/// Format a ratio as a percentage for breakdown reasons
pub(crate) fn describe_ratio(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.2}%", ratio * 100.0)
    } else {
        "unbounded (no turnover)".to_string()
    }
}

/// Compute the credit score of an invoice issuer
pub fn compute_credit_score(
    business_age: f64,
    annual_turnover: Decimal,
    gst_verified: bool,
    gst_active_years: f64,
    invoice_amount: Decimal,
) -> CreditScoreResult {
    let age_points = AGE_BANDS.lookup(business_age);
    let age_score = ScoreEntry::new(
        age_points,
        format!("Business age {business_age} years: +{age_points}"),
    );

    let turnover_points = TURNOVER_BANDS.lookup(to_f64(annual_turnover));
    let turnover_score = ScoreEntry::new(
        turnover_points,
        format!("Annual turnover {annual_turnover}: +{turnover_points}"),
    );

    let gst_score = gst_trust(gst_verified, gst_active_years);

    let ratio = exposure_ratio(invoice_amount, annual_turnover);
    let exposure_points = EXPOSURE_BANDS.lookup(ratio);
    let exposure_score = ScoreEntry::new(
        exposure_points,
        format!(
            "Invoice {invoice_amount} is {} of annual turnover: +{exposure_points}",
            describe_ratio(ratio)
        ),
    );

    let breakdown = CreditBreakdown {
        age_score,
        turnover_score,
        gst_score,
        exposure_score,
    };

    CreditScoreResult {
        score: breakdown.total().min(MAX_SCORE),
        breakdown,
    }
}

fn gst_trust(gst_verified: bool, gst_active_years: f64) -> ScoreEntry {
    if !gst_verified {
        return ScoreEntry::new(0, "GST not verified: +0");
    }
    if gst_active_years < GST_ESTABLISHED_YEARS {
        ScoreEntry::new(
            GST_NEW_POINTS,
            format!("GST verified, active {gst_active_years} years (under 1 year): +{GST_NEW_POINTS}"),
        )
    } else {
        ScoreEntry::new(
            GST_ESTABLISHED_POINTS,
            format!("GST verified, active {gst_active_years} years: +{GST_ESTABLISHED_POINTS}"),
        )
    }
}
