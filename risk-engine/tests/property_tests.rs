//! Property-based tests for scoring invariants
//!
//! - Both scores stay within 0-100 for any input
//! - Fusion is exactly `round(credit * (1 - fraud / 100))`
//! - Scorers are deterministic
//! - More exposure never earns more credit points

use invoice_risk_engine::fusion::fuse_scores;
use invoice_risk_engine::{compute_credit_score, compute_fraud_score, HistoricalInvoice};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating amounts (0.00 to 1,000 crore)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..1_000_000_000_000u64).prop_map(|paise| Decimal::new(paise as i64, 2))
}

/// Strategy for generating positive invoice amounts
fn invoice_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..100_000_000_000u64).prop_map(|paise| Decimal::new(paise as i64, 2))
}

fn years_strategy() -> impl Strategy<Value = f64> {
    0.0f64..100.0
}

proptest! {
    #[test]
    fn prop_credit_score_bounded(
        age in years_strategy(),
        turnover in amount_strategy(),
        gst_verified in any::<bool>(),
        gst_years in years_strategy(),
        amount in invoice_amount_strategy(),
    ) {
        let result = compute_credit_score(age, turnover, gst_verified, gst_years, amount);
        prop_assert!(result.score <= 100);
        prop_assert_eq!(result.score, result.breakdown.total().min(100));
    }

    #[test]
    fn prop_fraud_score_bounded(
        amount in invoice_amount_strategy(),
        turnover in amount_strategy(),
        age in years_strategy(),
        last6 in prop::collection::vec(amount_strategy(), 0..=6),
        history in prop::collection::vec(amount_strategy(), 0..=3),
        has_duplicate in any::<bool>(),
    ) {
        let history: Vec<HistoricalInvoice> = history.into_iter().map(HistoricalInvoice::new).collect();
        let result = compute_fraud_score(amount, turnover, age, &last6, &history, has_duplicate);

        prop_assert!(result.score <= 100);
        prop_assert_eq!(result.probability, f64::from(result.score) / 100.0);
        prop_assert!((0.0..=1.0).contains(&result.probability));
    }

    #[test]
    fn prop_fusion_matches_formula(credit in 0u32..=100, fraud in 0u32..=100) {
        let probability = f64::from(fraud) / 100.0;
        let fused = fuse_scores(credit, probability);
        let expected = (f64::from(credit) * (1.0 - probability)).round() as u32;

        prop_assert_eq!(fused, expected);
        prop_assert!(fused <= credit);
    }

    #[test]
    fn prop_scorers_are_deterministic(
        age in years_strategy(),
        turnover in amount_strategy(),
        amount in invoice_amount_strategy(),
        last6 in prop::collection::vec(amount_strategy(), 0..=6),
    ) {
        let history: Vec<HistoricalInvoice> = last6.iter().take(3).copied().map(HistoricalInvoice::new).collect();

        let credit_a = compute_credit_score(age, turnover, true, age, amount);
        let credit_b = compute_credit_score(age, turnover, true, age, amount);
        prop_assert_eq!(credit_a, credit_b);

        let fraud_a = compute_fraud_score(amount, turnover, age, &last6, &history, false);
        let fraud_b = compute_fraud_score(amount, turnover, age, &last6, &history, false);
        prop_assert_eq!(fraud_a, fraud_b);
    }

    #[test]
    fn prop_exposure_points_never_increase_with_amount(
        turnover in amount_strategy(),
        small in invoice_amount_strategy(),
        extra in invoice_amount_strategy(),
    ) {
        let large = small + extra;
        let low = compute_credit_score(3.0, turnover, true, 2.0, small);
        let high = compute_credit_score(3.0, turnover, true, 2.0, large);

        prop_assert!(high.breakdown.exposure_score.score <= low.breakdown.exposure_score.score);
    }
}

#[test]
fn test_zero_turnover_hits_extreme_bands() {
    let amount = Decimal::new(10_001, 0);
    let credit = compute_credit_score(4.0, Decimal::ZERO, true, 3.0, amount);
    let fraud = compute_fraud_score(amount, Decimal::ZERO, 4.0, &[], &[], false);

    assert_eq!(credit.breakdown.exposure_score.score, 5);
    assert_eq!(fraud.breakdown.ratio_risk.score, 30);
    assert_eq!(fraud.breakdown.spike_risk.score, 0);
}
