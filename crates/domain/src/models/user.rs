//! User account model.
//!
//! The workflow engine needs users only for ownership checks and for
//! resolving notification recipients; account management itself lives
//! outside this service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::actor::ActorRole;

/// A user account referenced by complaints and notifications.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: ActorRole,
    /// Department queue membership for staff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether outbound email may be sent to this user.
    pub fn can_receive_email(&self) -> bool {
        self.is_active && self.email_verified && !self.email.is_empty()
    }
}
