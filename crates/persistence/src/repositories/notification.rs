//! Notification repository for database operations.

use domain::models::NewNotification;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

/// Repository for in-app notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification row for one recipient.
    pub async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (recipient_id, complaint_id, notification_type, title, message, url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, recipient_id, complaint_id, notification_type, title, message, url,
                      is_read, created_at
            "#,
        )
        .bind(notification.recipient_id)
        .bind(notification.complaint_id.as_deref())
        .bind(notification.notification_type.to_string())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.url.as_deref())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List notifications for a recipient, newest first.
    pub async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications_for_recipient");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, recipient_id, complaint_id, notification_type, title, message, url,
                   is_read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(recipient_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count notifications for a recipient.
    pub async fn count_for_recipient(&self, recipient_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_notifications_for_recipient");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count unread notifications for a recipient.
    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_unread_notifications");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark one notification read. The recipient guard keeps users from
    /// touching rows that are not theirs. Returns whether a row changed.
    pub async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND recipient_id = $2
            "#,
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
