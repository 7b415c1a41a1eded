//! Scoring tables
//!
//! Currency thresholds use Indian numbering: 1 lakh (L) = 1,00,000 and
//! 1 crore (Cr) = 1,00,00,000.

use crate::bands::{Band, BandTable, Boundary};
use crate::types::{CreditRiskBand, FraudRiskBand};

/// Upper bound of every score
pub const MAX_SCORE: u32 = 100;

/// Business age in years -> credit points
pub const AGE_BANDS: BandTable<u32> = BandTable::new(
    &[
        Band { threshold: 1.0, value: 5 },
        Band { threshold: 2.0, value: 10 },
        Band { threshold: 3.0, value: 15 },
        Band { threshold: 5.0, value: 20 },
    ],
    25,
    Boundary::Below,
);

/// Annual turnover -> credit points
pub const TURNOVER_BANDS: BandTable<u32> = BandTable::new(
    &[
        Band { threshold: 1_000_000.0, value: 5 },   // 10L
        Band { threshold: 2_500_000.0, value: 10 },  // 25L
        Band { threshold: 5_000_000.0, value: 18 },  // 50L
        Band { threshold: 10_000_000.0, value: 24 }, // 1Cr
    ],
    30,
    Boundary::Below,
);

/// GST registration age below which the newer-registration points apply
pub const GST_ESTABLISHED_YEARS: f64 = 1.0;

/// Points for a verified GST registration younger than a year
pub const GST_NEW_POINTS: u32 = 10;

/// Points for a verified GST registration of a year or more
pub const GST_ESTABLISHED_POINTS: u32 = 15;

/// Invoice/turnover ratio -> credit points. Higher exposure earns fewer points.
pub const EXPOSURE_BANDS: BandTable<u32> = BandTable::new(
    &[
        Band { threshold: 0.05, value: 30 },
        Band { threshold: 0.10, value: 25 },
        Band { threshold: 0.20, value: 18 },
        Band { threshold: 0.30, value: 10 },
    ],
    5,
    Boundary::Below,
);

/// Invoice/turnover ratio -> fraud points
pub const RATIO_RISK_BANDS: BandTable<u32> = BandTable::new(
    &[
        Band { threshold: 0.05, value: 0 },
        Band { threshold: 0.10, value: 5 },
        Band { threshold: 0.20, value: 10 },
        Band { threshold: 0.30, value: 20 },
    ],
    30,
    Boundary::Below,
);

/// Multiple of the recent average -> fraud points. First match only.
pub const SPIKE_BANDS: BandTable<u32> = BandTable::new(
    &[
        Band { threshold: 2.0, value: 20 },
        Band { threshold: 1.5, value: 10 },
    ],
    0,
    Boundary::Above,
);

/// Number of recent invoices averaged for spike detection
pub const SPIKE_HISTORY_WINDOW: usize = 6;

/// Amounts divisible by this are treated as round
pub const ROUND_AMOUNT_UNIT: i64 = 10_000;

/// Number of recent invoices inspected for a repeated round-amount pattern
pub const ROUND_PATTERN_WINDOW: usize = 3;

/// Round amount seen on this invoice only
pub const ROUND_SINGLE_POINTS: u32 = 5;

/// Round amount repeated across the whole pattern window
pub const ROUND_REPEATED_POINTS: u32 = 15;

/// Invoice value a business can plausibly issue per year of age (10L)
pub const SAFE_LIMIT_PER_YEAR: f64 = 1_000_000.0;

/// Invoice exceeds the age-based safe limit
pub const AGE_MISMATCH_POINTS: u32 = 20;

/// Same buyer and invoice number seen within the duplicate window
pub const DUPLICATE_POINTS: u32 = 15;

/// Final score -> credit risk label (inclusive upper bounds)
pub const CREDIT_RISK_LABELS: BandTable<CreditRiskBand> = BandTable::new(
    &[
        Band { threshold: 39.0, value: CreditRiskBand::VeryHighRisk },
        Band { threshold: 59.0, value: CreditRiskBand::HighRisk },
        Band { threshold: 79.0, value: CreditRiskBand::ModerateRisk },
    ],
    CreditRiskBand::LowRisk,
    Boundary::AtMost,
);

/// Fraud score -> fraud risk label (inclusive upper bounds)
pub const FRAUD_RISK_LABELS: BandTable<FraudRiskBand> = BandTable::new(
    &[
        Band { threshold: 20.0, value: FraudRiskBand::Safe },
        Band { threshold: 40.0, value: FraudRiskBand::LowSuspicion },
        Band { threshold: 60.0, value: FraudRiskBand::MediumRisk },
        Band { threshold: 80.0, value: FraudRiskBand::HighRisk },
    ],
    FraudRiskBand::CriticalRisk,
    Boundary::AtMost,
);
