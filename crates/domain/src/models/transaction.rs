//! Audit transaction domain models.
//!
//! Every workflow operation appends exactly one transaction. Entries are
//! never updated or deleted; a complaint's history is reconstructed by
//! reading its transactions oldest to newest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Kind of audit entry, one per workflow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Initial submission by the customer.
    Submission,
    /// Staff reply with an action taken.
    Reply,
    /// Reassignment to a department queue.
    Forward,
    /// Reassignment to an individual staff member.
    Assignment,
    /// Status change not covered by a more specific kind.
    StatusUpdate,
    /// Customer rated the resolution.
    FeedbackSubmitted,
    /// Customer answered a more-information request.
    AdditionalInfoProvided,
    /// Scheduled closure after the feedback grace period lapsed.
    AutoClose,
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submission" => Ok(TransactionType::Submission),
            "reply" => Ok(TransactionType::Reply),
            "forward" => Ok(TransactionType::Forward),
            "assignment" => Ok(TransactionType::Assignment),
            "status_update" => Ok(TransactionType::StatusUpdate),
            "feedback_submitted" => Ok(TransactionType::FeedbackSubmitted),
            "additional_info_provided" => Ok(TransactionType::AdditionalInfoProvided),
            "auto_close" => Ok(TransactionType::AutoClose),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Submission => write!(f, "submission"),
            TransactionType::Reply => write!(f, "reply"),
            TransactionType::Forward => write!(f, "forward"),
            TransactionType::Assignment => write!(f, "assignment"),
            TransactionType::StatusUpdate => write!(f, "status_update"),
            TransactionType::FeedbackSubmitted => write!(f, "feedback_submitted"),
            TransactionType::AdditionalInfoProvided => write!(f, "additional_info_provided"),
            TransactionType::AutoClose => write!(f, "auto_close"),
        }
    }
}

/// One immutable audit entry in a complaint's history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub transaction_id: String,
    pub complaint_id: String,
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Actor identifier, or `system` for scheduled jobs.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for appending one audit entry.
#[derive(Debug, Clone, Validate)]
pub struct NewTransaction {
    #[validate(length(min = 1, message = "complaint_id is required"))]
    pub complaint_id: String,

    pub transaction_type: TransactionType,

    pub remarks: Option<String>,

    #[validate(length(min = 1, message = "created_by is required"))]
    pub created_by: String,
}

impl NewTransaction {
    pub fn new(
        complaint_id: impl Into<String>,
        transaction_type: TransactionType,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            complaint_id: complaint_id.into(),
            transaction_type,
            remarks: None,
            created_by: created_by.into(),
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// Query parameters for the recent-transactions listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecentTransactionsQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

fn default_recent_limit() -> i64 {
    20
}

/// Response body for transaction listings.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
}

/// Serialization format for the audit trail export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Query parameters for the audit trail export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExportTransactionsQuery {
    #[serde(default)]
    pub format: Option<ExportFormat>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl ExportTransactionsQuery {
    /// Reuse the recent-listing filters; the export path applies its own
    /// row cap instead of the limit.
    pub fn to_recent_query(&self) -> RecentTransactionsQuery {
        RecentTransactionsQuery {
            limit: default_recent_limit(),
            transaction_type: self.transaction_type.clone(),
            created_by: self.created_by.clone(),
        }
    }
}

/// Response body for the audit trail export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportTransactionsResponse {
    pub format: ExportFormat,
    pub record_count: i64,
    /// `data:` URL carrying the base64-encoded payload.
    pub download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trip() {
        let all = [
            TransactionType::Submission,
            TransactionType::Reply,
            TransactionType::Forward,
            TransactionType::Assignment,
            TransactionType::StatusUpdate,
            TransactionType::FeedbackSubmitted,
            TransactionType::AdditionalInfoProvided,
            TransactionType::AutoClose,
        ];
        for tt in all {
            let parsed: TransactionType = tt.to_string().parse().unwrap();
            assert_eq!(parsed, tt);
        }
    }

    #[test]
    fn test_transaction_type_from_str_rejects_unknown() {
        assert!(TransactionType::from_str("escalation").is_err());
    }

    #[test]
    fn test_transaction_type_serde_snake_case() {
        let json = serde_json::to_string(&TransactionType::AdditionalInfoProvided).unwrap();
        assert_eq!(json, "\"additional_info_provided\"");
    }

    #[test]
    fn test_new_transaction_builder() {
        let entry = NewTransaction::new("CMP-20260825-AAAAAA", TransactionType::Reply, "staff-1")
            .with_remarks("Replaced the unit");

        assert_eq!(entry.complaint_id, "CMP-20260825-AAAAAA");
        assert_eq!(entry.transaction_type, TransactionType::Reply);
        assert_eq!(entry.remarks.as_deref(), Some("Replaced the unit"));
        assert_eq!(entry.created_by, "staff-1");
    }

    #[test]
    fn test_new_transaction_validation_requires_ids() {
        let valid = NewTransaction::new("CMP-1", TransactionType::Submission, "system");
        assert!(valid.validate().is_ok());

        let missing_complaint = NewTransaction::new("", TransactionType::Submission, "system");
        assert!(missing_complaint.validate().is_err());

        let missing_actor = NewTransaction::new("CMP-1", TransactionType::Submission, "");
        assert!(missing_actor.validate().is_err());
    }

    #[test]
    fn test_recent_query_defaults() {
        let query: RecentTransactionsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 20);
        assert!(query.transaction_type.is_none());
        assert!(query.created_by.is_none());
    }

    #[test]
    fn test_export_format_defaults_to_csv() {
        let query: ExportTransactionsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.format.unwrap_or_default(), ExportFormat::Csv);
    }

    #[test]
    fn test_export_format_content_types() {
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
    }

    #[test]
    fn test_export_query_carries_filters_to_recent_query() {
        let query: ExportTransactionsQuery =
            serde_json::from_str(r#"{"format":"json","transaction_type":"reply"}"#).unwrap();
        let recent = query.to_recent_query();
        assert_eq!(recent.transaction_type.as_deref(), Some("reply"));
        assert!(recent.created_by.is_none());
    }
}
