//! Complaint endpoint handlers.
//!
//! Handlers stay thin: identity comes from the actor extractor, all workflow
//! rules live in the engine, and `ApiError` translates the outcome.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use domain::models::{
    AdditionalInfoRequest, AssignRequest, Complaint, FeedbackRequest, ListComplaintsQuery,
    ReplyRequest, RequestInfoRequest, SubmitComplaintRequest, TransactionsResponse,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::RequestActor;

/// Submit a new complaint.
///
/// POST /api/v1/complaints
///
/// Returns 201 with the stored complaint.
#[axum::debug_handler]
pub async fn submit_complaint(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(request): Json<SubmitComplaintRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = state.engine.submit(actor, request).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

/// List complaints with filters and pagination.
///
/// GET /api/v1/complaints
///
/// Customers see only their own complaints. Derived priorities are refreshed
/// before the page is assembled.
#[axum::debug_handler]
pub async fn list_complaints(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<ListComplaintsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.engine.list_complaints(actor, query).await?;
    debug!(
        count = page.items.len(),
        total = page.total,
        "Listed complaints"
    );
    Ok(Json(page))
}

/// Fetch a single complaint.
///
/// GET /api/v1/complaints/:complaint_id
///
/// Returns 404 when missing, 403 when a customer asks for someone else's.
#[axum::debug_handler]
pub async fn get_complaint(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state.engine.get_complaint(actor, &complaint_id).await?;
    Ok(Json(complaint))
}

/// Record a staff reply.
///
/// POST /api/v1/complaints/:complaint_id/reply
///
/// Returns 409 when the transition is illegal or lost a concurrent race.
#[axum::debug_handler]
pub async fn reply(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state.engine.reply(actor, &complaint_id, request).await?;
    Ok(Json(complaint))
}

/// Ask the customer for more information.
///
/// POST /api/v1/complaints/:complaint_id/request-info
#[axum::debug_handler]
pub async fn request_more_info(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
    Json(request): Json<RequestInfoRequest>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state
        .engine
        .request_more_info(actor, &complaint_id, request)
        .await?;
    Ok(Json(complaint))
}

/// Customer answers a more-information request.
///
/// POST /api/v1/complaints/:complaint_id/additional-info
#[axum::debug_handler]
pub async fn provide_additional_info(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
    Json(request): Json<AdditionalInfoRequest>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state
        .engine
        .provide_additional_info(actor, &complaint_id, request)
        .await?;
    Ok(Json(complaint))
}

/// Mark a replied complaint as resolved.
///
/// POST /api/v1/complaints/:complaint_id/resolve
#[axum::debug_handler]
pub async fn approve_resolution(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state.engine.approve_resolution(actor, &complaint_id).await?;
    Ok(Json(complaint))
}

/// Customer rates the handling, closing the complaint.
///
/// POST /api/v1/complaints/:complaint_id/feedback
#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state
        .engine
        .submit_feedback(actor, &complaint_id, request)
        .await?;
    Ok(Json(complaint))
}

/// Reassign to another staff member or department queue.
///
/// POST /api/v1/complaints/:complaint_id/assign
#[axum::debug_handler]
pub async fn assign_complaint(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<Complaint>, ApiError> {
    let complaint = state.engine.assign(actor, &complaint_id, request).await?;
    Ok(Json(complaint))
}

/// Full audit history for one complaint, oldest first.
///
/// GET /api/v1/complaints/:complaint_id/transactions
#[axum::debug_handler]
pub async fn get_history(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(complaint_id): Path<String>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = state.engine.history(actor, &complaint_id).await?;
    let count = transactions.len();
    Ok(Json(TransactionsResponse {
        transactions,
        count,
    }))
}
