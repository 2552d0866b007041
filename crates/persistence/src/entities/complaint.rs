//! Complaint entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Complaint, ComplaintPriority, ComplaintStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for complaint status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "complaint_status", rename_all = "lowercase")]
pub enum ComplaintStatusDb {
    Pending,
    Replied,
    Resolved,
    Reverted,
    Closed,
}

/// Database enum for complaint priority. Variant order matches the
/// Postgres enum declaration, so GREATEST() in SQL agrees with Ord here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(type_name = "complaint_priority", rename_all = "lowercase")]
pub enum ComplaintPriorityDb {
    Low,
    Medium,
    High,
    Critical,
}

impl From<ComplaintStatus> for ComplaintStatusDb {
    fn from(status: ComplaintStatus) -> Self {
        match status {
            ComplaintStatus::Pending => ComplaintStatusDb::Pending,
            ComplaintStatus::Replied => ComplaintStatusDb::Replied,
            ComplaintStatus::Resolved => ComplaintStatusDb::Resolved,
            ComplaintStatus::Reverted => ComplaintStatusDb::Reverted,
            ComplaintStatus::Closed => ComplaintStatusDb::Closed,
        }
    }
}

impl From<ComplaintStatusDb> for ComplaintStatus {
    fn from(status: ComplaintStatusDb) -> Self {
        match status {
            ComplaintStatusDb::Pending => ComplaintStatus::Pending,
            ComplaintStatusDb::Replied => ComplaintStatus::Replied,
            ComplaintStatusDb::Resolved => ComplaintStatus::Resolved,
            ComplaintStatusDb::Reverted => ComplaintStatus::Reverted,
            ComplaintStatusDb::Closed => ComplaintStatus::Closed,
        }
    }
}

impl From<ComplaintPriority> for ComplaintPriorityDb {
    fn from(priority: ComplaintPriority) -> Self {
        match priority {
            ComplaintPriority::Low => ComplaintPriorityDb::Low,
            ComplaintPriority::Medium => ComplaintPriorityDb::Medium,
            ComplaintPriority::High => ComplaintPriorityDb::High,
            ComplaintPriority::Critical => ComplaintPriorityDb::Critical,
        }
    }
}

impl From<ComplaintPriorityDb> for ComplaintPriority {
    fn from(priority: ComplaintPriorityDb) -> Self {
        match priority {
            ComplaintPriorityDb::Low => ComplaintPriority::Low,
            ComplaintPriorityDb::Medium => ComplaintPriority::Medium,
            ComplaintPriorityDb::High => ComplaintPriority::High,
            ComplaintPriorityDb::Critical => ComplaintPriority::Critical,
        }
    }
}

/// Database row mapping for the complaints table.
#[derive(Debug, Clone, FromRow)]
pub struct ComplaintEntity {
    pub complaint_id: String,
    pub customer_id: Uuid,
    pub status: ComplaintStatusDb,
    pub priority: ComplaintPriorityDb,
    pub category: String,
    pub complaint_type: String,
    pub subtype: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub department: String,
    pub assigned_to: String,
    pub action_taken: Option<String>,
    pub remarks: Option<String>,
    pub additional_info: Option<String>,
    pub rating: Option<i16>,
    pub rating_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplaintEntity> for Complaint {
    fn from(entity: ComplaintEntity) -> Self {
        Complaint {
            complaint_id: entity.complaint_id,
            customer_id: entity.customer_id,
            status: entity.status.into(),
            priority: entity.priority.into(),
            category: entity.category,
            complaint_type: entity.complaint_type,
            subtype: entity.subtype,
            description: entity.description,
            location: entity.location,
            department: entity.department,
            assigned_to: entity.assigned_to,
            action_taken: entity.action_taken,
            remarks: entity.remarks,
            additional_info: entity.additional_info,
            rating: entity.rating,
            rating_remarks: entity.rating_remarks,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        let statuses = [
            ComplaintStatus::Pending,
            ComplaintStatus::Replied,
            ComplaintStatus::Resolved,
            ComplaintStatus::Reverted,
            ComplaintStatus::Closed,
        ];
        for status in statuses {
            let db: ComplaintStatusDb = status.into();
            let back: ComplaintStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_priority_round_trip() {
        let priorities = [
            ComplaintPriority::Low,
            ComplaintPriority::Medium,
            ComplaintPriority::High,
            ComplaintPriority::Critical,
        ];
        for priority in priorities {
            let db: ComplaintPriorityDb = priority.into();
            let back: ComplaintPriority = db.into();
            assert_eq!(back, priority);
        }
    }

    #[test]
    fn test_priority_db_ordering_matches_domain() {
        assert!(ComplaintPriorityDb::Low < ComplaintPriorityDb::Medium);
        assert!(ComplaintPriorityDb::Medium < ComplaintPriorityDb::High);
        assert!(ComplaintPriorityDb::High < ComplaintPriorityDb::Critical);
    }

    #[test]
    fn test_entity_to_domain_mapping() {
        let now = Utc::now();
        let customer = Uuid::new_v4();
        let entity = ComplaintEntity {
            complaint_id: "CMP-20250101-A2B3C4".to_string(),
            customer_id: customer,
            status: ComplaintStatusDb::Replied,
            priority: ComplaintPriorityDb::High,
            category: "billing".to_string(),
            complaint_type: "overcharge".to_string(),
            subtype: None,
            description: "Charged twice for the same invoice".to_string(),
            location: Some("web portal".to_string()),
            department: "commercial".to_string(),
            assigned_to: "commercial".to_string(),
            action_taken: Some("Refund issued".to_string()),
            remarks: None,
            additional_info: None,
            rating: None,
            rating_remarks: None,
            created_at: now,
            updated_at: now,
        };

        let complaint: Complaint = entity.into();
        assert_eq!(complaint.complaint_id, "CMP-20250101-A2B3C4");
        assert_eq!(complaint.customer_id, customer);
        assert_eq!(complaint.status, ComplaintStatus::Replied);
        assert_eq!(complaint.priority, ComplaintPriority::High);
        assert_eq!(complaint.action_taken.as_deref(), Some("Refund issued"));
    }
}
