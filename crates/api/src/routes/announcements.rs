//! System-wide announcement endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;
use validator::Validate;

use domain::models::{ActorRole, AnnouncementRequest, AnnouncementResponse};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::RequestActor;

/// Broadcast an announcement to every active user.
///
/// POST /api/v1/announcements
///
/// Admin only. Delivery runs in a background task; the response reports how
/// many recipients will be reached. Returns 202.
#[axum::debug_handler]
pub async fn create_announcement(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(request): Json<AnnouncementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if actor.role != ActorRole::Admin {
        return Err(ApiError::Forbidden(
            "Admin role required for announcements".to_string(),
        ));
    }
    request.validate()?;

    let recipients = UserRepository::new(state.pool.clone())
        .list_active()
        .await?
        .len();

    info!(
        recipients,
        title = %request.title,
        "Announcement accepted"
    );

    // Email fan-out sleeps between sends, so delivery happens off-request.
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.announce(&request.title, &request.message).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(AnnouncementResponse {
            status: "accepted".to_string(),
            recipients,
        }),
    ))
}
