//! Transaction entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Transaction, TransactionType};
use sqlx::FromRow;

/// Database enum for transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
pub enum TransactionTypeDb {
    Submission,
    Reply,
    Forward,
    Assignment,
    StatusUpdate,
    FeedbackSubmitted,
    AdditionalInfoProvided,
    AutoClose,
}

impl From<TransactionType> for TransactionTypeDb {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Submission => TransactionTypeDb::Submission,
            TransactionType::Reply => TransactionTypeDb::Reply,
            TransactionType::Forward => TransactionTypeDb::Forward,
            TransactionType::Assignment => TransactionTypeDb::Assignment,
            TransactionType::StatusUpdate => TransactionTypeDb::StatusUpdate,
            TransactionType::FeedbackSubmitted => TransactionTypeDb::FeedbackSubmitted,
            TransactionType::AdditionalInfoProvided => TransactionTypeDb::AdditionalInfoProvided,
            TransactionType::AutoClose => TransactionTypeDb::AutoClose,
        }
    }
}

impl From<TransactionTypeDb> for TransactionType {
    fn from(kind: TransactionTypeDb) -> Self {
        match kind {
            TransactionTypeDb::Submission => TransactionType::Submission,
            TransactionTypeDb::Reply => TransactionType::Reply,
            TransactionTypeDb::Forward => TransactionType::Forward,
            TransactionTypeDb::Assignment => TransactionType::Assignment,
            TransactionTypeDb::StatusUpdate => TransactionType::StatusUpdate,
            TransactionTypeDb::FeedbackSubmitted => TransactionType::FeedbackSubmitted,
            TransactionTypeDb::AdditionalInfoProvided => TransactionType::AdditionalInfoProvided,
            TransactionTypeDb::AutoClose => TransactionType::AutoClose,
        }
    }
}

/// Database row mapping for the transactions table.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionEntity {
    pub transaction_id: String,
    pub complaint_id: String,
    pub transaction_type: TransactionTypeDb,
    pub remarks: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionEntity> for Transaction {
    fn from(entity: TransactionEntity) -> Self {
        Transaction {
            transaction_id: entity.transaction_id,
            complaint_id: entity.complaint_id,
            transaction_type: entity.transaction_type.into(),
            remarks: entity.remarks,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}
