//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Notification, NotificationType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notifications table.
///
/// The notification type is stored as text so new kinds can be added
/// without a schema change; unknown values fall back to `Announcement`.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub complaint_id: Option<String>,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for Notification {
    fn from(entity: NotificationEntity) -> Self {
        Notification {
            id: entity.id,
            recipient_id: entity.recipient_id,
            complaint_id: entity.complaint_id,
            notification_type: entity
                .notification_type
                .parse()
                .unwrap_or(NotificationType::Announcement),
            title: entity.title,
            message: entity.message,
            url: entity.url,
            is_read: entity.is_read,
            created_at: entity.created_at,
        }
    }
}
