//! Audit trail endpoint handlers.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::info;

use domain::models::{
    ExportFormat, ExportTransactionsQuery, ExportTransactionsResponse, RecentTransactionsQuery,
    Transaction, TransactionsResponse,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::RequestActor;

/// Recent audit entries across all complaints, newest first.
///
/// GET /api/v1/transactions/recent
///
/// Staff only. Optional `transaction_type` and `created_by` filters.
#[axum::debug_handler]
pub async fn recent_transactions(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<RecentTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Staff role required for the audit trail".to_string(),
        ));
    }

    let transactions = state.engine.recent_transactions(&query).await?;
    let count = transactions.len();
    Ok(Json(TransactionsResponse {
        transactions,
        count,
    }))
}

/// Export the audit trail as CSV or JSON.
///
/// GET /api/v1/transactions/export
///
/// Staff only. The payload is returned inline as a base64 data URL so report
/// consumers need no second request.
#[axum::debug_handler]
pub async fn export_transactions(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<ExportTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Staff role required for the audit trail".to_string(),
        ));
    }

    let format = query.format.unwrap_or_default();
    let transactions = state
        .engine
        .export_transactions(&query.to_recent_query())
        .await?;

    let (data, content_type) = generate_export_data(&transactions, format)?;
    let download_url = format!("data:{};base64,{}", content_type, STANDARD.encode(&data));

    info!(
        format = ?format,
        records = transactions.len(),
        "Audit trail exported"
    );

    Ok(Json(ExportTransactionsResponse {
        format,
        record_count: transactions.len() as i64,
        download_url,
    }))
}

fn generate_export_data(
    transactions: &[Transaction],
    format: ExportFormat,
) -> Result<(Vec<u8>, &'static str), ApiError> {
    match format {
        ExportFormat::Json => {
            let json = serde_json::to_vec_pretty(transactions)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok((json, format.content_type()))
        }
        ExportFormat::Csv => Ok((generate_csv(transactions).into_bytes(), format.content_type())),
    }
}

/// Render the audit trail as CSV.
/// Includes a UTF-8 BOM for Excel compatibility.
fn generate_csv(transactions: &[Transaction]) -> String {
    let mut csv = String::new();
    csv.push('\u{FEFF}');
    csv.push_str("transaction_id,complaint_id,transaction_type,remarks,created_by,created_at\n");

    for entry in transactions {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape_csv(&entry.transaction_id),
            escape_csv(&entry.complaint_id),
            entry.transaction_type,
            escape_csv(entry.remarks.as_deref().unwrap_or("")),
            escape_csv(&entry.created_by),
            entry.created_at.to_rfc3339(),
        ));
    }

    csv
}

/// Quote CSV fields containing commas, quotes, or newlines.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::TransactionType;
    use fake::{Fake, Faker};
    use uuid::Uuid;

    fn sample(remarks: Option<&str>) -> Transaction {
        Transaction {
            transaction_id: "TXN-20260825-AAAAAA".to_string(),
            complaint_id: "CMP-20260825-BBBBBB".to_string(),
            transaction_type: TransactionType::Reply,
            remarks: remarks.map(String::from),
            created_by: Faker.fake::<Uuid>().to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_csv_plain_value() {
        assert_eq!(escape_csv("replaced unit"), "replaced unit");
    }

    #[test]
    fn test_escape_csv_quotes_commas_and_quotes() {
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("said \"no\""), "\"said \"\"no\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_generate_csv_header_and_rows() {
        let csv = generate_csv(&[sample(Some("Replaced the faulty meter"))]);
        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.contains(
            "transaction_id,complaint_id,transaction_type,remarks,created_by,created_at"
        ));
        assert!(csv.contains("TXN-20260825-AAAAAA"));
        assert!(csv.contains("reply"));
        assert!(csv.contains("Replaced the faulty meter"));
    }

    #[test]
    fn test_generate_csv_escapes_remarks() {
        let csv = generate_csv(&[sample(Some("visited, then replaced"))]);
        assert!(csv.contains("\"visited, then replaced\""));
    }

    #[test]
    fn test_generate_export_data_json() {
        let (data, content_type) =
            generate_export_data(&[sample(None)], ExportFormat::Json).unwrap();
        assert_eq!(content_type, "application/json");
        let parsed: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(parsed[0]["transaction_type"], "reply");
    }

    #[test]
    fn test_generate_export_data_csv_content_type() {
        let (_, content_type) = generate_export_data(&[sample(None)], ExportFormat::Csv).unwrap();
        assert_eq!(content_type, "text/csv");
    }
}
