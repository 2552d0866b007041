//! Complaint domain models for the grievance workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a complaint.
///
/// The set is closed; callers never see free-form status strings. Legacy
/// cased values (`Pending`, `REPLIED`) normalize through [`FromStr`] at the
/// edges, and the persistence layer stores a database enum so nothing else
/// can reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    /// Submitted and waiting for a staff response.
    Pending,
    /// Staff replied; waiting on the customer to confirm or rate.
    Replied,
    /// Resolution approved by staff; feedback requested.
    Resolved,
    /// More information required from the customer.
    Reverted,
    /// Terminal. No transition leaves this status.
    Closed,
}

impl ComplaintStatus {
    /// True once the complaint can never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Closed)
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ComplaintStatus::Pending),
            "replied" => Ok(ComplaintStatus::Replied),
            "resolved" => Ok(ComplaintStatus::Resolved),
            "reverted" => Ok(ComplaintStatus::Reverted),
            "closed" => Ok(ComplaintStatus::Closed),
            _ => Err(format!("Unknown complaint status: {}", s)),
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintStatus::Pending => write!(f, "pending"),
            ComplaintStatus::Replied => write!(f, "replied"),
            ComplaintStatus::Resolved => write!(f, "resolved"),
            ComplaintStatus::Reverted => write!(f, "reverted"),
            ComplaintStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Priority of a complaint.
///
/// Declaration order defines severity ordering, which the escalation policy
/// relies on: a stored priority is never lowered, only raised toward the
/// age-derived value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for ComplaintPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(ComplaintPriority::Low),
            "medium" => Ok(ComplaintPriority::Medium),
            "high" => Ok(ComplaintPriority::High),
            "critical" => Ok(ComplaintPriority::Critical),
            _ => Err(format!("Unknown complaint priority: {}", s)),
        }
    }
}

impl std::fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintPriority::Low => write!(f, "low"),
            ComplaintPriority::Medium => write!(f, "medium"),
            ComplaintPriority::High => write!(f, "high"),
            ComplaintPriority::Critical => write!(f, "critical"),
        }
    }
}

/// One customer grievance tracked through its lifecycle.
///
/// `status` and `updated_at` change only through the workflow engine; nothing
/// else writes them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Complaint {
    pub complaint_id: String,
    pub customer_id: Uuid,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    pub category: String,
    #[serde(rename = "type")]
    pub complaint_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub department: String,
    /// Staff user id or department queue name currently responsible.
    pub assigned_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to submit a new complaint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitComplaintRequest {
    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "type must be 1-100 characters"))]
    pub complaint_type: String,

    #[validate(length(max = 100, message = "subtype must be at most 100 characters"))]
    pub subtype: Option<String>,

    #[validate(custom(function = "shared::validation::validate_description"))]
    pub description: String,

    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,

    /// Defaults to the configured intake queue when omitted.
    #[validate(custom(function = "shared::validation::validate_assignee"))]
    pub assigned_to: Option<String>,
}

/// Staff reply payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ReplyRequest {
    #[validate(length(min = 1, max = 2000, message = "action_taken must be 1-2000 characters"))]
    pub action_taken: String,

    #[validate(custom(function = "shared::validation::validate_remarks"))]
    pub remarks: Option<String>,
}

/// Staff request for more information.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RequestInfoRequest {
    #[validate(length(min = 1, max = 2000, message = "remarks must be 1-2000 characters"))]
    pub remarks: String,
}

/// Customer response to a more-information request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AdditionalInfoRequest {
    #[validate(length(min = 1, max = 4000, message = "additional_info must be 1-4000 characters"))]
    pub additional_info: String,
}

/// Customer feedback closing the loop.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct FeedbackRequest {
    #[validate(custom(function = "shared::validation::validate_rating"))]
    pub rating: i16,

    #[validate(custom(function = "shared::validation::validate_remarks"))]
    pub remarks: Option<String>,
}

/// Reassignment payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AssignRequest {
    #[validate(custom(function = "shared::validation::validate_assignee"))]
    pub new_assignee: String,
}

/// Query parameters for the staff complaint listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListComplaintsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_round_trip() {
        let all = [
            ComplaintStatus::Pending,
            ComplaintStatus::Replied,
            ComplaintStatus::Resolved,
            ComplaintStatus::Reverted,
            ComplaintStatus::Closed,
        ];
        for status in all {
            let parsed: ComplaintStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_from_str_normalizes_case() {
        // Legacy records carry mixed casing
        assert_eq!(
            ComplaintStatus::from_str("Pending").unwrap(),
            ComplaintStatus::Pending
        );
        assert_eq!(
            ComplaintStatus::from_str("REPLIED").unwrap(),
            ComplaintStatus::Replied
        );
        assert_eq!(
            ComplaintStatus::from_str("resolved").unwrap(),
            ComplaintStatus::Resolved
        );
        assert!(ComplaintStatus::from_str("awaiting_approval").is_err());
    }

    #[test]
    fn test_only_closed_is_terminal() {
        assert!(ComplaintStatus::Closed.is_terminal());
        assert!(!ComplaintStatus::Pending.is_terminal());
        assert!(!ComplaintStatus::Replied.is_terminal());
        assert!(!ComplaintStatus::Resolved.is_terminal());
        assert!(!ComplaintStatus::Reverted.is_terminal());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(ComplaintPriority::Low < ComplaintPriority::Medium);
        assert!(ComplaintPriority::Medium < ComplaintPriority::High);
        assert!(ComplaintPriority::High < ComplaintPriority::Critical);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(
            ComplaintPriority::from_str("critical").unwrap(),
            ComplaintPriority::Critical
        );
        assert_eq!(
            ComplaintPriority::from_str("Medium").unwrap(),
            ComplaintPriority::Medium
        );
        assert!(ComplaintPriority::from_str("urgent").is_err());
    }

    #[test]
    fn test_status_serde_uses_lowercase() {
        let json = serde_json::to_string(&ComplaintStatus::Reverted).unwrap();
        assert_eq!(json, "\"reverted\"");
    }

    #[test]
    fn test_submit_request_validation() {
        let request = SubmitComplaintRequest {
            category: "billing".to_string(),
            complaint_type: "overcharge".to_string(),
            subtype: None,
            description: "Charged twice for the same invoice.".to_string(),
            location: None,
            assigned_to: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_request_rejects_blank_description() {
        let request = SubmitComplaintRequest {
            category: "billing".to_string(),
            complaint_type: "overcharge".to_string(),
            subtype: None,
            description: "   ".to_string(),
            location: None,
            assigned_to: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_request_type_field_rename() {
        let request: SubmitComplaintRequest = serde_json::from_str(
            r#"{
                "category": "delivery",
                "type": "late",
                "description": "Package arrived two weeks late."
            }"#,
        )
        .unwrap();
        assert_eq!(request.complaint_type, "late");
        assert!(request.assigned_to.is_none());
    }

    #[test]
    fn test_feedback_request_rating_bounds() {
        let ok = FeedbackRequest {
            rating: 4,
            remarks: None,
        };
        assert!(ok.validate().is_ok());

        let out_of_range = FeedbackRequest {
            rating: 6,
            remarks: None,
        };
        assert!(out_of_range.validate().is_err());

        let zero = FeedbackRequest {
            rating: 0,
            remarks: None,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_assign_request_accepts_queue_or_uuid() {
        let queue = AssignRequest {
            new_assignee: "commercial".to_string(),
        };
        assert!(queue.validate().is_ok());

        let staff = AssignRequest {
            new_assignee: Uuid::new_v4().to_string(),
        };
        assert!(staff.validate().is_ok());

        let bad = AssignRequest {
            new_assignee: "front desk".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListComplaintsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 20);
        assert!(query.status.is_none());
    }

    #[test]
    fn test_complaint_serializes_type_field() {
        let complaint = Complaint {
            complaint_id: "CMP-20260825-AAAAAA".to_string(),
            customer_id: Uuid::new_v4(),
            status: ComplaintStatus::Pending,
            priority: ComplaintPriority::Medium,
            category: "delivery".to_string(),
            complaint_type: "late".to_string(),
            subtype: None,
            description: "Package arrived late.".to_string(),
            location: None,
            department: "commercial".to_string(),
            assigned_to: "commercial".to_string(),
            action_taken: None,
            remarks: None,
            additional_info: None,
            rating: None,
            rating_remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&complaint).unwrap();
        assert_eq!(json["type"], "late");
        assert_eq!(json["status"], "pending");
        assert!(json.get("rating").is_none());
    }
}
