//! Fraud scoring
//!
//! Five independent heuristics, each only ever adding points:
//!
//! - ratio risk: invoice size relative to annual turnover
//! - spike risk: invoice size relative to the recent invoice average
//! - round risk: round amounts, weighted up when the recent history repeats them
//! - age mismatch: invoice larger than the business age supports
//! - duplicate risk: same buyer and invoice number seen recently
//!
//! The sum is clamped to 0-100 and `probability = score / 100`.

use crate::constants::{
    AGE_MISMATCH_POINTS, DUPLICATE_POINTS, MAX_SCORE, RATIO_RISK_BANDS, ROUND_AMOUNT_UNIT,
    ROUND_PATTERN_WINDOW, ROUND_REPEATED_POINTS, ROUND_SINGLE_POINTS, SAFE_LIMIT_PER_YEAR,
    SPIKE_BANDS,
};
use crate::credit::{describe_ratio, exposure_ratio, to_f64};
use crate::types::{FraudBreakdown, FraudScoreResult, HistoricalInvoice, ScoreEntry};
use rust_decimal::Decimal;

/// Compute the fraud score of an invoice
pub fn compute_fraud_score(
    invoice_amount: Decimal,
    annual_turnover: Decimal,
    business_age: f64,
    last6_invoices: &[Decimal],
    invoice_history: &[HistoricalInvoice],
    has_duplicate: bool,
) -> FraudScoreResult {
    let breakdown = FraudBreakdown {
        ratio_risk: ratio_risk(invoice_amount, annual_turnover),
        spike_risk: spike_risk(invoice_amount, last6_invoices),
        round_risk: round_risk(invoice_amount, invoice_history),
        age_mismatch_risk: age_mismatch_risk(invoice_amount, business_age),
        duplicate_risk: duplicate_risk(has_duplicate),
    };

    let score = breakdown.total().min(MAX_SCORE);

    FraudScoreResult {
        score,
        probability: f64::from(score) / 100.0,
        breakdown,
    }
}

fn ratio_risk(invoice_amount: Decimal, annual_turnover: Decimal) -> ScoreEntry {
    let ratio = exposure_ratio(invoice_amount, annual_turnover);
    let points = RATIO_RISK_BANDS.lookup(ratio);
    ScoreEntry::new(
        points,
        format!(
            "Invoice is {} of annual turnover: +{points}",
            describe_ratio(ratio)
        ),
    )
}

fn spike_risk(invoice_amount: Decimal, last6_invoices: &[Decimal]) -> ScoreEntry {
    if last6_invoices.is_empty() {
        return ScoreEntry::new(0, "No recent invoices to compare");
    }

    let total: Decimal = last6_invoices.iter().sum();
    let mean = total / Decimal::from(last6_invoices.len());
    if mean <= Decimal::ZERO {
        return ScoreEntry::new(0, "Recent invoice average is zero");
    }

    let multiplier = to_f64(invoice_amount) / to_f64(mean);
    let points = SPIKE_BANDS.lookup(multiplier);
    ScoreEntry::new(
        points,
        format!(
            "Invoice is {multiplier:.2}x the average of last {} invoices ({}): +{points}",
            last6_invoices.len(),
            mean.round_dp(2)
        ),
    )
}

fn is_round(amount: Decimal) -> bool {
    (amount % Decimal::from(ROUND_AMOUNT_UNIT)).is_zero()
}

fn round_risk(invoice_amount: Decimal, invoice_history: &[HistoricalInvoice]) -> ScoreEntry {
    if !is_round(invoice_amount) {
        return ScoreEntry::new(0, "No round amount pattern detected");
    }

    let recent = &invoice_history[..invoice_history.len().min(ROUND_PATTERN_WINDOW)];
    let repeated =
        recent.len() == ROUND_PATTERN_WINDOW && recent.iter().all(|inv| is_round(inv.amount));

    if repeated {
        ScoreEntry::new(
            ROUND_REPEATED_POINTS,
            format!(
                "Round amount {invoice_amount}, multiple instance across last {ROUND_PATTERN_WINDOW} invoices: +{ROUND_REPEATED_POINTS}"
            ),
        )
    } else {
        ScoreEntry::new(
            ROUND_SINGLE_POINTS,
            format!("Round amount {invoice_amount}, single instance: +{ROUND_SINGLE_POINTS}"),
        )
    }
}

fn age_mismatch_risk(invoice_amount: Decimal, business_age: f64) -> ScoreEntry {
    let safe_limit = business_age * SAFE_LIMIT_PER_YEAR;
    if to_f64(invoice_amount) > safe_limit {
        ScoreEntry::new(
            AGE_MISMATCH_POINTS,
            format!(
                "Invoice {invoice_amount} exceeds safe limit {safe_limit} for {business_age} years in business: +{AGE_MISMATCH_POINTS}"
            ),
        )
    } else {
        ScoreEntry::new(
            0,
            format!("Invoice {invoice_amount} within safe limit {safe_limit}"),
        )
    }
}

fn duplicate_risk(has_duplicate: bool) -> ScoreEntry {
    if has_duplicate {
        ScoreEntry::new(
            DUPLICATE_POINTS,
            format!("Same buyer and invoice number already submitted recently: +{DUPLICATE_POINTS}"),
        )
    } else {
        ScoreEntry::new(0, "No duplicate invoice found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn history(amounts: &[Decimal]) -> Vec<HistoricalInvoice> {
        amounts.iter().copied().map(HistoricalInvoice::new).collect()
    }

    #[test]
    fn test_clean_invoice_scores_zero() {
        let result = compute_fraud_score(dec!(95000), dec!(2000000), 2.0, &[], &[], false);

        assert_eq!(result.score, 0);
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn test_zero_turnover_takes_highest_ratio_band() {
        let entry = ratio_risk(dec!(1000), Decimal::ZERO);
        assert_eq!(entry.score, 30);
    }

    #[test]
    fn test_ratio_bands() {
        assert_eq!(ratio_risk(dec!(40000), dec!(1000000)).score, 0);
        assert_eq!(ratio_risk(dec!(50000), dec!(1000000)).score, 5);
        assert_eq!(ratio_risk(dec!(150000), dec!(1000000)).score, 10);
        assert_eq!(ratio_risk(dec!(250000), dec!(1000000)).score, 20);
        assert_eq!(ratio_risk(dec!(300000), dec!(1000000)).score, 30);
    }

    #[test]
    fn test_spike_thresholds_are_not_cumulative() {
        let recent = [dec!(10000), dec!(10000)];

        assert_eq!(spike_risk(dec!(25000), &recent).score, 20);
        assert_eq!(spike_risk(dec!(20000), &recent).score, 10);
        assert_eq!(spike_risk(dec!(16000), &recent).score, 10);
        assert_eq!(spike_risk(dec!(15000), &recent).score, 0);
    }

    #[test]
    fn test_spike_without_history() {
        assert_eq!(spike_risk(dec!(500000), &[]).score, 0);
        assert_eq!(spike_risk(dec!(500000), &[Decimal::ZERO]).score, 0);
    }

    #[test]
    fn test_round_amount_patterns() {
        let all_round = history(&[dec!(20000), dec!(30000), dec!(40000)]);
        let mixed = history(&[dec!(20000), dec!(30001)]);

        assert_eq!(round_risk(dec!(50000), &all_round).score, 15);
        assert_eq!(round_risk(dec!(50000), &mixed).score, 5);
        assert_eq!(round_risk(dec!(50000), &[]).score, 5);
        assert_eq!(round_risk(dec!(50001), &all_round).score, 0);
    }

    #[test]
    fn test_round_pattern_only_looks_at_three_most_recent() {
        let longer = history(&[dec!(10000), dec!(20000), dec!(30000), dec!(12345)]);
        assert_eq!(round_risk(dec!(40000), &longer).score, 15);
    }

    #[test]
    fn test_fractional_amount_is_not_round() {
        assert!(!is_round(dec!(10000.50)));
        assert!(is_round(dec!(10000.00)));
    }

    #[test]
    fn test_age_mismatch() {
        assert_eq!(age_mismatch_risk(dec!(1500000), 1.0).score, 20);
        assert_eq!(age_mismatch_risk(dec!(1000000), 1.0).score, 0);
        assert_eq!(age_mismatch_risk(dec!(1), 0.0).score, 20);
    }

    #[test]
    fn test_stacked_signals_are_clamped() {
        let recent = [dec!(1000)];
        let round = history(&[dec!(10000), dec!(20000), dec!(30000)]);
        let result = compute_fraud_score(dec!(5000000), Decimal::ZERO, 0.5, &recent, &round, true);

        // 30 + 20 + 15 + 20 + 15 = 100
        assert_eq!(result.breakdown.total(), 100);
        assert_eq!(result.score, 100);
        assert_eq!(result.probability, 1.0);
    }
}
