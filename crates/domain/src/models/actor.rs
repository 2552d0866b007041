//! Actor identity supplied with every workflow operation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Role of the actor initiating a workflow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Customer who owns complaints they submitted.
    Customer,
    /// Support staff member.
    Staff,
    /// Administrator with full access.
    Admin,
    /// Scheduled maintenance jobs. Never accepted from the transport layer.
    System,
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(ActorRole::Customer),
            "staff" => Ok(ActorRole::Staff),
            "admin" => Ok(ActorRole::Admin),
            "system" => Ok(ActorRole::System),
            _ => Err(format!("Unknown actor role: {}", s)),
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::Customer => write!(f, "customer"),
            ActorRole::Staff => write!(f, "staff"),
            ActorRole::Admin => write!(f, "admin"),
            ActorRole::System => write!(f, "system"),
        }
    }
}

impl ActorRole {
    /// True for staff and admin roles.
    pub fn is_staff(&self) -> bool {
        matches!(self, ActorRole::Staff | ActorRole::Admin)
    }
}

/// The identity behind an operation, supplied by the calling layer after its
/// own authentication. Workflow operations never consult ambient state for
/// "who is acting".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Uuid, role: ActorRole) -> Self {
        Self { id, role }
    }

    /// Actor recorded for scheduled jobs.
    pub fn system() -> Self {
        Self {
            id: Uuid::nil(),
            role: ActorRole::System,
        }
    }

    /// Value stored in the audit trail's `created_by` column.
    pub fn audit_name(&self) -> String {
        match self.role {
            ActorRole::System => "system".to_string(),
            _ => self.id.to_string(),
        }
    }
}
