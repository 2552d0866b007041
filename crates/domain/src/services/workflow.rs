//! Complaint workflow transition rules.
//!
//! The transition table is the single source of truth for which status
//! moves are legal and which actor role may trigger them. Everything here is
//! pure; persistence and side effects live with the engine that calls it.

use thiserror::Error;

use crate::models::{Actor, ActorRole, Complaint, ComplaintStatus};

/// Operations that move a complaint through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Submit,
    Reply,
    RequestMoreInfo,
    ProvideAdditionalInfo,
    ApproveResolution,
    SubmitFeedback,
    AutoClose,
    Assign,
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowAction::Submit => write!(f, "submit"),
            WorkflowAction::Reply => write!(f, "reply"),
            WorkflowAction::RequestMoreInfo => write!(f, "request-more-info"),
            WorkflowAction::ProvideAdditionalInfo => write!(f, "provide-additional-info"),
            WorkflowAction::ApproveResolution => write!(f, "approve-resolution"),
            WorkflowAction::SubmitFeedback => write!(f, "submit-feedback"),
            WorkflowAction::AutoClose => write!(f, "auto-close"),
            WorkflowAction::Assign => write!(f, "assign"),
        }
    }
}

/// Failure cases for workflow operations.
///
/// Notification failures have no variant on purpose: the dispatcher logs
/// them and the transition still succeeds.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(
        "transition {action} is not allowed from status {} for role {role}",
        status_label(.current)
    )]
    InvalidTransition {
        current: Option<ComplaintStatus>,
        action: WorkflowAction,
        role: ActorRole,
    },

    /// A concurrent transition won the compare-and-persist race.
    #[error("complaint {complaint_id} changed concurrently during {action}; observed status {observed}")]
    Conflict {
        complaint_id: String,
        observed: ComplaintStatus,
        action: WorkflowAction,
    },

    #[error("actor is not authorized for complaint {complaint_id}")]
    AccessDenied { complaint_id: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("complaint {0} not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The status mutation persisted but the audit append failed. The
    /// operation is reported as failed and the complaint needs manual
    /// reconciliation.
    #[error("audit write failed for complaint {complaint_id}: {source}")]
    AuditWrite {
        complaint_id: String,
        #[source]
        source: sqlx::Error,
    },
}

fn status_label(current: &Option<ComplaintStatus>) -> String {
    match current {
        Some(status) => status.to_string(),
        None => "none".to_string(),
    }
}

impl From<validator::ValidationErrors> for WorkflowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        WorkflowError::Validation(errors.to_string())
    }
}

/// Validate one transition against the workflow table and return the target
/// status. `current` is `None` only for `Submit`, which creates the
/// complaint.
///
/// `Assign` returns the observed status unchanged: reassignment moves the
/// complaint between queues or staff without touching its lifecycle.
pub fn validate_transition(
    current: Option<ComplaintStatus>,
    action: WorkflowAction,
    role: ActorRole,
) -> Result<ComplaintStatus, WorkflowError> {
    use ComplaintStatus::{Pending, Replied, Resolved, Reverted};
    use WorkflowAction as A;

    let target = match (current, action, role) {
        (None, A::Submit, ActorRole::Customer) => Pending,

        (Some(Pending | Replied), A::Reply, ActorRole::Staff | ActorRole::Admin) => Replied,

        (Some(Pending | Replied), A::RequestMoreInfo, ActorRole::Staff | ActorRole::Admin) => {
            Reverted
        }

        (Some(Reverted), A::ProvideAdditionalInfo, ActorRole::Customer) => Pending,

        (Some(Replied), A::ApproveResolution, ActorRole::Staff | ActorRole::Admin) => Resolved,

        (Some(Replied), A::SubmitFeedback, ActorRole::Customer) => ComplaintStatus::Closed,

        (Some(Replied), A::AutoClose, ActorRole::System) => ComplaintStatus::Closed,

        (Some(observed @ (Pending | Replied)), A::Assign, ActorRole::Staff | ActorRole::Admin) => {
            observed
        }

        _ => {
            return Err(WorkflowError::InvalidTransition {
                current,
                action,
                role,
            })
        }
    };

    Ok(target)
}

/// Verify the acting customer owns the complaint.
pub fn ensure_owner(actor: &Actor, complaint: &Complaint) -> Result<(), WorkflowError> {
    if actor.id == complaint.customer_id {
        Ok(())
    } else {
        Err(WorkflowError::AccessDenied {
            complaint_id: complaint.complaint_id.clone(),
        })
    }
}

/// Verify a staff actor may reply to this complaint.
///
/// When the complaint is assigned to an individual staff member, only that
/// member (or an admin) may reply. Queue-assigned complaints accept a reply
/// from any staff member.
pub fn ensure_assigned_staff(actor: &Actor, complaint: &Complaint) -> Result<(), WorkflowError> {
    if actor.role == ActorRole::Admin {
        return Ok(());
    }
    if let Ok(assignee_id) = complaint.assigned_to.parse::<uuid::Uuid>() {
        if assignee_id != actor.id {
            return Err(WorkflowError::AccessDenied {
                complaint_id: complaint.complaint_id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::ComplaintPriority;

    const ALL_STATUSES: [ComplaintStatus; 5] = [
        ComplaintStatus::Pending,
        ComplaintStatus::Replied,
        ComplaintStatus::Resolved,
        ComplaintStatus::Reverted,
        ComplaintStatus::Closed,
    ];

    const ALL_ACTIONS: [WorkflowAction; 8] = [
        WorkflowAction::Submit,
        WorkflowAction::Reply,
        WorkflowAction::RequestMoreInfo,
        WorkflowAction::ProvideAdditionalInfo,
        WorkflowAction::ApproveResolution,
        WorkflowAction::SubmitFeedback,
        WorkflowAction::AutoClose,
        WorkflowAction::Assign,
    ];

    const ALL_ROLES: [ActorRole; 4] = [
        ActorRole::Customer,
        ActorRole::Staff,
        ActorRole::Admin,
        ActorRole::System,
    ];

    fn complaint_owned_by(customer_id: Uuid, assigned_to: &str) -> Complaint {
        Complaint {
            complaint_id: "CMP-20260820-TEST42".to_string(),
            customer_id,
            status: ComplaintStatus::Pending,
            priority: ComplaintPriority::Medium,
            category: "billing".to_string(),
            complaint_type: "overcharge".to_string(),
            subtype: None,
            description: "Charged twice.".to_string(),
            location: None,
            department: "commercial".to_string(),
            assigned_to: assigned_to.to_string(),
            action_taken: None,
            remarks: None,
            additional_info: None,
            rating: None,
            rating_remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_submit_only_for_customers() {
        assert_eq!(
            validate_transition(None, WorkflowAction::Submit, ActorRole::Customer).unwrap(),
            ComplaintStatus::Pending
        );
        for role in [ActorRole::Staff, ActorRole::Admin, ActorRole::System] {
            assert!(validate_transition(None, WorkflowAction::Submit, role).is_err());
        }
    }

    #[test]
    fn test_reply_from_pending_and_replied() {
        for current in [ComplaintStatus::Pending, ComplaintStatus::Replied] {
            for role in [ActorRole::Staff, ActorRole::Admin] {
                assert_eq!(
                    validate_transition(Some(current), WorkflowAction::Reply, role).unwrap(),
                    ComplaintStatus::Replied
                );
            }
        }
    }

    #[test]
    fn test_customers_cannot_reply() {
        let err = validate_transition(
            Some(ComplaintStatus::Pending),
            WorkflowAction::Reply,
            ActorRole::Customer,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[test]
    fn test_request_more_info_reverts() {
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Pending),
                WorkflowAction::RequestMoreInfo,
                ActorRole::Staff,
            )
            .unwrap(),
            ComplaintStatus::Reverted
        );
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Replied),
                WorkflowAction::RequestMoreInfo,
                ActorRole::Admin,
            )
            .unwrap(),
            ComplaintStatus::Reverted
        );
    }

    #[test]
    fn test_additional_info_returns_to_pending() {
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Reverted),
                WorkflowAction::ProvideAdditionalInfo,
                ActorRole::Customer,
            )
            .unwrap(),
            ComplaintStatus::Pending
        );
        // Staff cannot answer on the customer's behalf
        assert!(validate_transition(
            Some(ComplaintStatus::Reverted),
            WorkflowAction::ProvideAdditionalInfo,
            ActorRole::Staff,
        )
        .is_err());
    }

    #[test]
    fn test_approve_resolution_only_from_replied() {
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Replied),
                WorkflowAction::ApproveResolution,
                ActorRole::Staff,
            )
            .unwrap(),
            ComplaintStatus::Resolved
        );
        for current in [
            ComplaintStatus::Pending,
            ComplaintStatus::Resolved,
            ComplaintStatus::Reverted,
            ComplaintStatus::Closed,
        ] {
            assert!(validate_transition(
                Some(current),
                WorkflowAction::ApproveResolution,
                ActorRole::Staff,
            )
            .is_err());
        }
    }

    #[test]
    fn test_feedback_closes_from_replied_only() {
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Replied),
                WorkflowAction::SubmitFeedback,
                ActorRole::Customer,
            )
            .unwrap(),
            ComplaintStatus::Closed
        );
        assert!(validate_transition(
            Some(ComplaintStatus::Pending),
            WorkflowAction::SubmitFeedback,
            ActorRole::Customer,
        )
        .is_err());
        assert!(validate_transition(
            Some(ComplaintStatus::Reverted),
            WorkflowAction::SubmitFeedback,
            ActorRole::Customer,
        )
        .is_err());
    }

    #[test]
    fn test_auto_close_is_system_only() {
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Replied),
                WorkflowAction::AutoClose,
                ActorRole::System,
            )
            .unwrap(),
            ComplaintStatus::Closed
        );
        for role in [ActorRole::Customer, ActorRole::Staff, ActorRole::Admin] {
            assert!(
                validate_transition(Some(ComplaintStatus::Replied), WorkflowAction::AutoClose, role)
                    .is_err()
            );
        }
    }

    #[test]
    fn test_assign_preserves_status() {
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Pending),
                WorkflowAction::Assign,
                ActorRole::Staff,
            )
            .unwrap(),
            ComplaintStatus::Pending
        );
        assert_eq!(
            validate_transition(
                Some(ComplaintStatus::Replied),
                WorkflowAction::Assign,
                ActorRole::Admin,
            )
            .unwrap(),
            ComplaintStatus::Replied
        );
        assert!(validate_transition(
            Some(ComplaintStatus::Reverted),
            WorkflowAction::Assign,
            ActorRole::Staff,
        )
        .is_err());
    }

    #[test]
    fn test_closed_is_terminal_for_every_action_and_role() {
        for action in ALL_ACTIONS {
            for role in ALL_ROLES {
                assert!(
                    validate_transition(Some(ComplaintStatus::Closed), action, role).is_err(),
                    "{action} by {role} must not leave closed"
                );
            }
        }
    }

    #[test]
    fn test_resolved_has_no_outgoing_edges() {
        for action in ALL_ACTIONS {
            for role in ALL_ROLES {
                assert!(
                    validate_transition(Some(ComplaintStatus::Resolved), action, role).is_err(),
                    "{action} by {role} must not leave resolved"
                );
            }
        }
    }

    #[test]
    fn test_full_table_sweep_matches_expected_edges() {
        // Every legal (current, action, role, target) combination; everything
        // else must fail.
        let mut legal = 0;
        for current in ALL_STATUSES {
            for action in ALL_ACTIONS {
                for role in ALL_ROLES {
                    if validate_transition(Some(current), action, role).is_ok() {
                        legal += 1;
                    }
                }
            }
        }
        // reply: 2 statuses x 2 roles, request-more-info: 2 x 2,
        // provide-additional-info: 1, approve: 2 roles, feedback: 1,
        // auto-close: 1, assign: 2 x 2
        assert_eq!(legal, 4 + 4 + 1 + 2 + 1 + 1 + 4);
    }

    #[test]
    fn test_invalid_transition_error_names_all_parts() {
        let err = validate_transition(
            Some(ComplaintStatus::Closed),
            WorkflowAction::Reply,
            ActorRole::Staff,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("reply"));
        assert!(message.contains("closed"));
        assert!(message.contains("staff"));
    }

    #[test]
    fn test_invalid_submit_error_labels_missing_status() {
        let err = validate_transition(None, WorkflowAction::Submit, ActorRole::Staff).unwrap_err();
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn test_ensure_owner() {
        let owner = Uuid::new_v4();
        let complaint = complaint_owned_by(owner, "commercial");

        let actor = Actor::new(owner, ActorRole::Customer);
        assert!(ensure_owner(&actor, &complaint).is_ok());

        let other = Actor::new(Uuid::new_v4(), ActorRole::Customer);
        let err = ensure_owner(&other, &complaint).unwrap_err();
        assert!(matches!(err, WorkflowError::AccessDenied { .. }));
    }

    #[test]
    fn test_ensure_assigned_staff_for_individual_assignment() {
        let staff_id = Uuid::new_v4();
        let complaint = complaint_owned_by(Uuid::new_v4(), &staff_id.to_string());

        let assignee = Actor::new(staff_id, ActorRole::Staff);
        assert!(ensure_assigned_staff(&assignee, &complaint).is_ok());

        let other_staff = Actor::new(Uuid::new_v4(), ActorRole::Staff);
        assert!(ensure_assigned_staff(&other_staff, &complaint).is_err());

        let admin = Actor::new(Uuid::new_v4(), ActorRole::Admin);
        assert!(ensure_assigned_staff(&admin, &complaint).is_ok());
    }

    #[test]
    fn test_ensure_assigned_staff_for_queue_assignment() {
        let complaint = complaint_owned_by(Uuid::new_v4(), "commercial");
        let any_staff = Actor::new(Uuid::new_v4(), ActorRole::Staff);
        assert!(ensure_assigned_staff(&any_staff, &complaint).is_ok());
    }

    #[test]
    fn test_conflict_error_reports_observed_status() {
        let err = WorkflowError::Conflict {
            complaint_id: "CMP-20260820-TEST42".to_string(),
            observed: ComplaintStatus::Replied,
            action: WorkflowAction::Reply,
        };
        let message = err.to_string();
        assert!(message.contains("CMP-20260820-TEST42"));
        assert!(message.contains("replied"));
    }
}
