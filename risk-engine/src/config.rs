//! Configuration for the risk engine
//!
//! Only the review policy and the duplicate window are configurable. Scoring
//! tables and history windows live in [`crate::constants`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Thresholds that hold an invoice for manual review
    pub review: ReviewPolicy,

    /// Window for duplicate detection (hours)
    pub duplicate_window_hours: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            review: ReviewPolicy::default(),
            duplicate_window_hours: 24,
        }
    }
}

/// Manual review thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewPolicy {
    /// Fraud score at or above which the invoice is held
    pub fraud_review_threshold: u32,

    /// Final score below which the invoice is held
    pub final_score_floor: u32,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            fraud_review_threshold: 80,
            final_score_floor: 40,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults overridden by `RISK_ENGINE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = EngineConfig::default();

        if let Some(value) = env_var("RISK_ENGINE_FRAUD_REVIEW_THRESHOLD")? {
            config.review.fraud_review_threshold = value;
        }

        if let Some(value) = env_var("RISK_ENGINE_FINAL_SCORE_FLOOR")? {
            config.review.final_score_floor = value;
        }

        if let Some(value) = env_var("RISK_ENGINE_DUPLICATE_WINDOW_HOURS")? {
            config.duplicate_window_hours = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.review.fraud_review_threshold > 100 {
            return Err(Error::InvalidConfig(format!(
                "fraud_review_threshold {} exceeds 100",
                self.review.fraud_review_threshold
            )));
        }
        if self.review.final_score_floor > 100 {
            return Err(Error::InvalidConfig(format!(
                "final_score_floor {} exceeds 100",
                self.review.final_score_floor
            )));
        }
        if self.duplicate_window_hours <= 0 {
            return Err(Error::InvalidConfig(
                "duplicate_window_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("{} has invalid value {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}
