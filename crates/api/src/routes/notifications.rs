//! Notification endpoint handlers.
//!
//! Recipients read their own rows; marking one read is the only mutation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use domain::models::{Notification, NotificationListQuery, UnreadCountResponse};
use persistence::repositories::NotificationRepository;
use shared::pagination::{PageParams, Paged};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::RequestActor;

/// List the caller's notifications, newest first.
///
/// GET /api/v1/notifications
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());
    let params = PageParams {
        page: query.page,
        per_page: query.per_page,
    };

    let rows = repo
        .list_for_recipient(actor.id, params.limit(), params.offset())
        .await?;
    let total = repo.count_for_recipient(actor.id).await?;

    let items: Vec<Notification> = rows.into_iter().map(Notification::from).collect();
    Ok(Json(Paged::new(items, params, total)))
}

/// Unread badge count for the caller.
///
/// GET /api/v1/notifications/unread-count
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());
    let unread = repo.unread_count(actor.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark one of the caller's notifications as read.
///
/// POST /api/v1/notifications/:id/read
///
/// Returns 204; 404 when the row does not exist or belongs to someone else.
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());
    let updated = repo.mark_read(id, actor.id).await?;

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Notification not found".to_string()))
    }
}
