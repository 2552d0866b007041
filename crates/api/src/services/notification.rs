//! Notification dispatch.
//!
//! Turns committed transitions into in-app notification rows and, for
//! customer-facing updates, at most one email. Dispatch failures are
//! logged and never propagated: the transition has already happened and
//! a missed notification must not undo it.

use domain::models::{NewNotification, NotificationType, User};
use domain::services::{draft_for_transition, NotificationDraft, RecipientKind, TransitionEvent};
use persistence::repositories::{NotificationRepository, UserRepository};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::middleware::metrics::record_notification_sent;
use crate::services::email::{EmailMessage, EmailService};

/// Delivers notifications produced by the workflow.
#[derive(Clone)]
pub struct NotificationDispatcher {
    pool: PgPool,
    email: EmailService,
}

impl NotificationDispatcher {
    /// Create a new dispatcher over the given pool and email service.
    pub fn new(pool: PgPool, email: EmailService) -> Self {
        Self { pool, email }
    }

    /// Deliver the notification for a committed transition, if any.
    pub async fn dispatch_transition(&self, event: &TransitionEvent) {
        let Some(draft) = draft_for_transition(event) else {
            return;
        };

        let recipients = match self.resolve_recipients(&draft, event).await {
            Ok(recipients) => recipients,
            Err(e) => {
                error!(
                    complaint_id = %event.complaint_id,
                    error = %e,
                    "Failed to resolve notification recipients"
                );
                return;
            }
        };

        if recipients.is_empty() {
            debug!(
                complaint_id = %event.complaint_id,
                assigned_to = %event.assigned_to,
                "No recipients for transition notification"
            );
            return;
        }

        let notifications = NotificationRepository::new(self.pool.clone());
        for user in &recipients {
            let row = NewNotification {
                recipient_id: user.id,
                complaint_id: Some(event.complaint_id.clone()),
                notification_type: draft.notification_type,
                title: draft.title.clone(),
                message: draft.message.clone(),
                url: Some(draft.url.clone()),
            };
            match notifications.create(&row).await {
                Ok(_) => record_notification_sent("in_app"),
                Err(e) => error!(
                    complaint_id = %event.complaint_id,
                    recipient = %user.id,
                    error = %e,
                    "Failed to create notification row"
                ),
            }
        }

        // At most one email per transition, to the first recipient able
        // to receive one.
        if draft.email {
            if let Some(user) = recipients.iter().find(|u| u.can_receive_email()) {
                self.send_draft_email(user, &draft, &event.complaint_id)
                    .await;
            }
        }
    }

    /// Service-wide announcement: one in-app row per active user, plus
    /// optional emails with a pause between sends. Returns the number of
    /// in-app rows created.
    pub async fn announce(&self, title: &str, message: &str) -> usize {
        let users = UserRepository::new(self.pool.clone());
        let recipients: Vec<User> = match users.list_active().await {
            Ok(entities) => entities.into_iter().map(User::from).collect(),
            Err(e) => {
                error!(error = %e, "Failed to load announcement recipients");
                return 0;
            }
        };

        let notifications = NotificationRepository::new(self.pool.clone());
        let mut created = 0usize;
        for user in &recipients {
            let row = NewNotification {
                recipient_id: user.id,
                complaint_id: None,
                notification_type: NotificationType::Announcement,
                title: title.to_string(),
                message: message.to_string(),
                url: None,
            };
            match notifications.create(&row).await {
                Ok(_) => {
                    created += 1;
                    record_notification_sent("in_app");
                }
                Err(e) => error!(
                    recipient = %user.id,
                    error = %e,
                    "Failed to create announcement row"
                ),
            }
        }

        if self.email.is_enabled() {
            let delay = Duration::from_millis(self.email.send_delay_ms());
            for user in recipients.iter().filter(|u| u.can_receive_email()) {
                let email = EmailMessage {
                    to: user.email.clone(),
                    to_name: Some(user.display_name.clone()),
                    subject: title.to_string(),
                    body: message.to_string(),
                };
                if let Err(e) = self.email.send(email).await {
                    error!(recipient = %user.id, error = %e, "Announcement email failed");
                } else {
                    record_notification_sent("email");
                }
                tokio::time::sleep(delay).await;
            }
        }

        info!(recipients = created, "Announcement dispatched");
        created
    }

    async fn resolve_recipients(
        &self,
        draft: &NotificationDraft,
        event: &TransitionEvent,
    ) -> Result<Vec<User>, sqlx::Error> {
        let users = UserRepository::new(self.pool.clone());
        match draft.recipient {
            RecipientKind::Customer => Ok(users
                .find_by_id(event.customer_id)
                .await?
                .map(User::from)
                .into_iter()
                .collect()),
            RecipientKind::Assignee => match Uuid::parse_str(&event.assigned_to) {
                Ok(staff_id) => Ok(users
                    .find_by_id(staff_id)
                    .await?
                    .map(User::from)
                    .into_iter()
                    .collect()),
                Err(_) => Ok(users
                    .staff_in_department(&event.assigned_to)
                    .await?
                    .into_iter()
                    .map(User::from)
                    .collect()),
            },
        }
    }

    async fn send_draft_email(&self, user: &User, draft: &NotificationDraft, complaint_id: &str) {
        let message = EmailMessage {
            to: user.email.clone(),
            to_name: Some(user.display_name.clone()),
            subject: draft.title.clone(),
            body: email_body(&draft.message, &draft.url, self.email.base_url()),
        };
        match self.email.send(message).await {
            Ok(()) => {
                if self.email.is_enabled() {
                    record_notification_sent("email");
                }
            }
            Err(e) => error!(
                complaint_id = %complaint_id,
                recipient = %user.id,
                error = %e,
                "Email delivery failed"
            ),
        }
    }
}

/// Compose a plain-text body, appending an absolute complaint link when a
/// frontend base URL is configured.
fn email_body(message: &str, url: &str, base_url: &str) -> String {
    if base_url.is_empty() {
        message.to_string()
    } else {
        format!(
            "{}\n\nView the complaint: {}{}",
            message,
            base_url.trim_end_matches('/'),
            url
        )
    }
}
