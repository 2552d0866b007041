//! Transaction repository for database operations.
//!
//! Transactions are append-only: rows are inserted and read, never
//! updated or deleted.

use chrono::Utc;
use domain::models::NewTransaction;
use sqlx::PgPool;

use crate::entities::{TransactionEntity, TransactionTypeDb};
use crate::metrics::QueryTimer;

/// Repository for transaction-log database operations.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry to the log. The entry identifier is generated here
    /// so every insert carries a fresh one.
    pub async fn append(&self, entry: &NewTransaction) -> Result<TransactionEntity, sqlx::Error> {
        let timer = QueryTimer::new("append_transaction");
        let transaction_id = shared::ids::transaction_id(Utc::now());
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            INSERT INTO transactions (transaction_id, complaint_id, transaction_type, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING transaction_id, complaint_id, transaction_type, remarks, created_by, created_at
            "#,
        )
        .bind(&transaction_id)
        .bind(&entry.complaint_id)
        .bind(TransactionTypeDb::from(entry.transaction_type))
        .bind(entry.remarks.as_deref())
        .bind(&entry.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Full history for one complaint, oldest entry first.
    pub async fn list_for_complaint(
        &self,
        complaint_id: &str,
    ) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_transactions_for_complaint");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            SELECT transaction_id, complaint_id, transaction_type, remarks, created_by, created_at
            FROM transactions
            WHERE complaint_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Most recent entries across all complaints, newest first.
    pub async fn recent(
        &self,
        type_filter: Option<TransactionTypeDb>,
        created_by: Option<&str>,
        limit: i64,
    ) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_transactions");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            SELECT transaction_id, complaint_id, transaction_type, remarks, created_by, created_at
            FROM transactions
            WHERE ($1::transaction_type IS NULL OR transaction_type = $1)
              AND ($2::text IS NULL OR created_by = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(type_filter)
        .bind(created_by)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Entries for export, in chronological order up to the cap.
    pub async fn list_for_export(
        &self,
        type_filter: Option<TransactionTypeDb>,
        created_by: Option<&str>,
        limit: i64,
    ) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_transactions_for_export");
        let result = sqlx::query_as::<_, TransactionEntity>(
            r#"
            SELECT transaction_id, complaint_id, transaction_type, remarks, created_by, created_at
            FROM transactions
            WHERE ($1::transaction_type IS NULL OR transaction_type = $1)
              AND ($2::text IS NULL OR created_by = $2)
            ORDER BY created_at ASC
            LIMIT $3
            "#,
        )
        .bind(type_filter)
        .bind(created_by)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
