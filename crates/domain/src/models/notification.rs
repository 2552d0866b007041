//! In-app notification domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Category of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ComplaintSubmitted,
    ComplaintReplied,
    MoreInfoRequested,
    AdditionalInfoProvided,
    FeedbackRequested,
    ComplaintAssigned,
    /// System-wide announcement, not tied to a complaint.
    Announcement,
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complaint_submitted" => Ok(NotificationType::ComplaintSubmitted),
            "complaint_replied" => Ok(NotificationType::ComplaintReplied),
            "more_info_requested" => Ok(NotificationType::MoreInfoRequested),
            "additional_info_provided" => Ok(NotificationType::AdditionalInfoProvided),
            "feedback_requested" => Ok(NotificationType::FeedbackRequested),
            "complaint_assigned" => Ok(NotificationType::ComplaintAssigned),
            "announcement" => Ok(NotificationType::Announcement),
            _ => Err(format!("Unknown notification type: {}", s)),
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::ComplaintSubmitted => write!(f, "complaint_submitted"),
            NotificationType::ComplaintReplied => write!(f, "complaint_replied"),
            NotificationType::MoreInfoRequested => write!(f, "more_info_requested"),
            NotificationType::AdditionalInfoProvided => write!(f, "additional_info_provided"),
            NotificationType::FeedbackRequested => write!(f, "feedback_requested"),
            NotificationType::ComplaintAssigned => write!(f, "complaint_assigned"),
            NotificationType::Announcement => write!(f, "announcement"),
        }
    }
}

/// One in-app notification row.
///
/// Created by the dispatcher; the only permitted mutation afterwards is the
/// recipient marking it read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<String>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification row.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub complaint_id: Option<String>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub url: Option<String>,
}

/// Response body for the unread badge endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

/// Query parameters for the recipient's notification listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    shared::pagination::DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    shared::pagination::DEFAULT_PER_PAGE
}

/// Admin request for a system-wide announcement.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 4000, message = "message must be 1-4000 characters"))]
    pub message: String,
}

/// Acknowledgement returned while delivery continues in the background.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementResponse {
    pub status: String,
    /// Active users the announcement will reach.
    pub recipients: usize,
}
