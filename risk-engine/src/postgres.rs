//! PostgreSQL-backed invoice store
//!
//! The analysis insert and the invoice status update run inside a single
//! transaction; any failure drops the transaction and rolls both back.

use crate::error::StoreError;
use crate::store::{HistoryProvider, RiskAnalysisStore, StoreResult};
use crate::types::{HistoricalInvoice, InvoiceStatus, RiskAnalysisRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        amount NUMERIC(20, 2) NOT NULL,
        buyer_identifier TEXT NOT NULL,
        invoice_number TEXT,
        status TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_invoices_user_created
        ON invoices (user_id, created_at DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS risk_analyses (
        id UUID PRIMARY KEY,
        invoice_id UUID NOT NULL UNIQUE REFERENCES invoices (id),
        credit_score INTEGER NOT NULL,
        fraud_score INTEGER NOT NULL,
        fraud_probability DOUBLE PRECISION NOT NULL,
        final_score INTEGER NOT NULL,
        credit_risk_band TEXT NOT NULL,
        fraud_risk_band TEXT NOT NULL,
        breakdown JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Invoice store over a Postgres pool
pub struct PgInvoiceStore {
    pool: PgPool,
}

impl PgInvoiceStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the tables this store reads and writes if they are missing
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryProvider for PgInvoiceStore {
    async fn find_recent_invoices(
        &self,
        user_id: Uuid,
        exclude_invoice_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<HistoricalInvoice>> {
        let amounts: Vec<Decimal> = sqlx::query_scalar(
            r#"
            SELECT amount FROM invoices
            WHERE user_id = $1 AND id <> $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(exclude_invoice_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(amounts.into_iter().map(HistoricalInvoice::new).collect())
    }

    async fn find_duplicate_invoice(
        &self,
        user_id: Uuid,
        exclude_invoice_id: Uuid,
        buyer_identifier: &str,
        invoice_number: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM invoices
                WHERE user_id = $1
                  AND id <> $2
                  AND buyer_identifier = $3
                  AND invoice_number = $4
                  AND created_at >= $5
            )
            "#,
        )
        .bind(user_id)
        .bind(exclude_invoice_id)
        .bind(buyer_identifier)
        .bind(invoice_number)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl RiskAnalysisStore for PgInvoiceStore {
    async fn commit_analysis(
        &self,
        record: &RiskAnalysisRecord,
        status: InvoiceStatus,
    ) -> StoreResult<RiskAnalysisRecord> {
        let breakdown = serde_json::to_value(&record.breakdown)
            .map_err(|e| StoreError::Transaction(format!("Failed to encode breakdown: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO risk_analyses (
                id, invoice_id, credit_score, fraud_score, fraud_probability,
                final_score, credit_risk_band, fraud_risk_band, breakdown, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (invoice_id) DO NOTHING
            "#,
        )
        .bind(record.id)
        .bind(record.invoice_id)
        .bind(record.credit_score as i32)
        .bind(record.fraud_score as i32)
        .bind(record.fraud_probability)
        .bind(record.final_score as i32)
        .bind(record.credit_risk_band.label())
        .bind(record.fraud_risk_band.label())
        .bind(breakdown)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(StoreError::AnalysisExists(record.invoice_id));
        }

        let updated = sqlx::query(
            r#"
            UPDATE invoices SET status = $1 WHERE id = $2
            "#,
        )
        .bind(status.as_str())
        .bind(record.invoice_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::InvoiceNotFound(record.invoice_id));
        }

        tx.commit().await?;
        Ok(record.clone())
    }
}
