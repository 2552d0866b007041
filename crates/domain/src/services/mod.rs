//! Domain services for Complaint Desk.
//!
//! Services contain the pure business rules that operate on domain models:
//! the workflow transition table, the escalation policy, and notification
//! drafting. All I/O stays in the layers above.

pub mod escalation;
pub mod notification;
pub mod workflow;

pub use escalation::EscalationPolicy;

pub use notification::{
    complaint_url, draft_for_transition, NotificationDraft, RecipientKind, TransitionEvent,
};

pub use workflow::{
    ensure_assigned_staff, ensure_owner, validate_transition, WorkflowAction, WorkflowError,
};
