//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `invoice_risk_evaluations_total{status}` - Completed evaluations by resulting invoice status
//! - `invoice_risk_evaluation_failures_total` - Evaluations that failed on storage
//! - `invoice_risk_final_score` - Histogram of fused final scores
//! - `invoice_risk_fraud_score` - Histogram of fraud scores

use crate::types::RiskAnalysisResult;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

const SCORE_BUCKETS: [f64; 10] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

/// Metrics collector
#[derive(Clone)]
pub struct EngineMetrics {
    /// Completed evaluations by status
    pub evaluations_total: IntCounterVec,

    /// Failed evaluations
    pub evaluation_failures: IntCounter,

    /// Final score histogram
    pub final_score: Histogram,

    /// Fraud score histogram
    pub fraud_score: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl EngineMetrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let evaluations_total = IntCounterVec::new(
            Opts::new(
                "invoice_risk_evaluations_total",
                "Completed invoice risk evaluations by resulting status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(evaluations_total.clone()))?;

        let evaluation_failures = IntCounter::new(
            "invoice_risk_evaluation_failures_total",
            "Invoice risk evaluations that failed",
        )?;
        registry.register(Box::new(evaluation_failures.clone()))?;

        let final_score = Histogram::with_opts(
            HistogramOpts::new("invoice_risk_final_score", "Fused final scores")
                .buckets(SCORE_BUCKETS.to_vec()),
        )?;
        registry.register(Box::new(final_score.clone()))?;

        let fraud_score = Histogram::with_opts(
            HistogramOpts::new("invoice_risk_fraud_score", "Fraud scores")
                .buckets(SCORE_BUCKETS.to_vec()),
        )?;
        registry.register(Box::new(fraud_score.clone()))?;

        Ok(Self {
            evaluations_total,
            evaluation_failures,
            final_score,
            fraud_score,
            registry,
        })
    }

    /// Record a completed evaluation
    pub fn record_evaluation(&self, result: &RiskAnalysisResult) {
        self.evaluations_total
            .with_label_values(&[result.status.as_str()])
            .inc();
        self.final_score.observe(f64::from(result.final_score));
        self.fraud_score.observe(f64::from(result.fraud_score));
    }

    /// Record a failed evaluation
    pub fn record_failure(&self) {
        self.evaluation_failures.inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_registries() {
        let first = EngineMetrics::new().unwrap();
        let second = EngineMetrics::new().unwrap();

        first.record_failure();
        assert_eq!(first.evaluation_failures.get(), 1);
        assert_eq!(second.evaluation_failures.get(), 0);
        assert!(first
            .render()
            .unwrap()
            .contains("invoice_risk_evaluation_failures_total 1"));
    }
}
