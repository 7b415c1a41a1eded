//! Risk Engine for the invoice financing marketplace
//!
//! Deterministic credit scoring, fraud scoring and score fusion for every
//! submitted invoice.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bands;
pub mod config;
pub mod constants;
pub mod credit;
pub mod engine;
pub mod error;
pub mod fraud;
pub mod fusion;
pub mod memory;
pub mod metrics;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod store;
pub mod telemetry;
pub mod types;

pub use config::{EngineConfig, ReviewPolicy};
pub use credit::compute_credit_score;
pub use engine::{build_analysis, InvoiceRiskRequest, RiskEngine};
pub use error::{Error, Result, StoreError};
pub use fraud::compute_fraud_score;
pub use memory::{InMemoryInvoiceStore, StoredInvoice};
pub use metrics::EngineMetrics;
#[cfg(feature = "postgres")]
pub use postgres::PgInvoiceStore;
pub use store::{HistoryProvider, RiskAnalysisStore, StoreResult};
pub use types::*;
