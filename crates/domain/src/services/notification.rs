//! Drafting of transition notifications.
//!
//! Pure mapping from a committed transition to the notification it produces.
//! Delivery (row inserts, email, recipient resolution) is the dispatcher's
//! job in the service layer; nothing here touches I/O.

use uuid::Uuid;

use super::workflow::WorkflowAction;
use crate::models::NotificationType;

/// Who a transition notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    /// The customer who owns the complaint.
    Customer,
    /// The assigned staff member, or every active staff member of the
    /// assigned department queue.
    Assignee,
}

/// Everything the dispatcher needs to know about a committed transition.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    pub complaint_id: String,
    pub customer_id: Uuid,
    pub assigned_to: String,
    pub action: WorkflowAction,
    /// Audit name of the actor, e.g. a user id or `system`.
    pub acted_by: String,
}

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub recipient: RecipientKind,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub url: String,
    /// Whether the draft also warrants an email to the recipient.
    pub email: bool,
}

/// Build the notification for a committed transition, if the transition
/// notifies anyone. Feedback submission and auto-close close the loop
/// without notifying.
pub fn draft_for_transition(event: &TransitionEvent) -> Option<NotificationDraft> {
    let url = complaint_url(&event.complaint_id);
    let id = &event.complaint_id;

    let draft = match event.action {
        WorkflowAction::Submit => NotificationDraft {
            recipient: RecipientKind::Assignee,
            notification_type: NotificationType::ComplaintSubmitted,
            title: "New complaint received".to_string(),
            message: format!("Complaint {id} was submitted and awaits a first response."),
            url,
            email: false,
        },
        WorkflowAction::Reply => NotificationDraft {
            recipient: RecipientKind::Customer,
            notification_type: NotificationType::ComplaintReplied,
            title: "Your complaint has a reply".to_string(),
            message: format!("Support replied to complaint {id}. Review the response and confirm or rate it."),
            url,
            email: true,
        },
        WorkflowAction::RequestMoreInfo => NotificationDraft {
            recipient: RecipientKind::Customer,
            notification_type: NotificationType::MoreInfoRequested,
            title: "More information required".to_string(),
            message: format!("Complaint {id} needs more information from you before work can continue."),
            url,
            email: true,
        },
        WorkflowAction::ProvideAdditionalInfo => NotificationDraft {
            recipient: RecipientKind::Assignee,
            notification_type: NotificationType::AdditionalInfoProvided,
            title: "Additional information provided".to_string(),
            message: format!("The customer added the requested information to complaint {id}."),
            url,
            email: false,
        },
        WorkflowAction::ApproveResolution => NotificationDraft {
            recipient: RecipientKind::Customer,
            notification_type: NotificationType::FeedbackRequested,
            title: "Please rate the resolution".to_string(),
            message: format!("Complaint {id} was marked resolved. Let us know how we did."),
            url,
            email: true,
        },
        WorkflowAction::Assign => NotificationDraft {
            recipient: RecipientKind::Assignee,
            notification_type: NotificationType::ComplaintAssigned,
            title: "Complaint assigned to you".to_string(),
            message: format!("Complaint {id} is now assigned to {}.", event.assigned_to),
            url,
            email: false,
        },
        WorkflowAction::SubmitFeedback | WorkflowAction::AutoClose => return None,
    };

    Some(draft)
}

/// Relative link to the complaint detail view, resolved against the
/// configured frontend base url at delivery time.
pub fn complaint_url(complaint_id: &str) -> String {
    format!("/complaints/{complaint_id}")
}
