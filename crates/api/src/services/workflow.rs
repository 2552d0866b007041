//! Orchestration of complaint lifecycle operations.
//!
//! The engine wires the pure transition rules from the domain crate to the
//! repositories and the notification dispatcher. Every state change follows
//! the same shape: load, authorize, validate the transition, compare-and-set
//! the status row, append the audit entry, notify.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, error, info};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    Actor, ActorRole, AdditionalInfoRequest, AssignRequest, Complaint, ComplaintStatus,
    FeedbackRequest, ListComplaintsQuery, NewTransaction, RecentTransactionsQuery, ReplyRequest,
    RequestInfoRequest, SubmitComplaintRequest, Transaction, TransactionType,
};
use domain::services::{
    ensure_assigned_staff, ensure_owner, validate_transition, EscalationPolicy, TransitionEvent,
    WorkflowAction, WorkflowError,
};
use persistence::entities::{ComplaintStatusDb, TransactionTypeDb};
use persistence::repositories::{
    ComplaintListFilter, ComplaintRepository, TransactionRepository, TransitionUpdate,
};
use shared::pagination::{PageParams, Paged};

use crate::config::WorkflowConfig;
use crate::middleware::metrics::{
    record_auto_closed, record_priorities_escalated, record_transition,
};
use crate::services::notification::NotificationDispatcher;

/// Hard cap on rows returned by the transaction export.
const EXPORT_LIMIT: i64 = 10_000;

/// Coordinates complaint state changes, the audit log and notifications.
#[derive(Clone)]
pub struct WorkflowEngine {
    complaints: ComplaintRepository,
    transactions: TransactionRepository,
    dispatcher: NotificationDispatcher,
    escalation: EscalationPolicy,
    default_queue: String,
    auto_close_grace: Duration,
}

impl WorkflowEngine {
    pub fn new(pool: PgPool, dispatcher: NotificationDispatcher, config: &WorkflowConfig) -> Self {
        Self {
            complaints: ComplaintRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool),
            dispatcher,
            escalation: EscalationPolicy::with_baseline(config.baseline()),
            default_queue: config.default_queue.clone(),
            auto_close_grace: Duration::days(config.auto_close_grace_days),
        }
    }

    /// Register a new complaint and write its submission audit entry.
    pub async fn submit(
        &self,
        actor: Actor,
        request: SubmitComplaintRequest,
    ) -> Result<Complaint, WorkflowError> {
        request.validate()?;
        let status = validate_transition(None, WorkflowAction::Submit, actor.role)?;

        let now = Utc::now();
        let assigned_to = request
            .assigned_to
            .unwrap_or_else(|| self.default_queue.clone());
        let complaint = Complaint {
            complaint_id: shared::ids::complaint_id(now),
            customer_id: actor.id,
            status,
            priority: self.escalation.baseline,
            category: request.category,
            complaint_type: request.complaint_type,
            subtype: request.subtype,
            description: request.description,
            location: request.location,
            department: department_for(&assigned_to, &self.default_queue),
            assigned_to,
            action_taken: None,
            remarks: None,
            additional_info: None,
            rating: None,
            rating_remarks: None,
            created_at: now,
            updated_at: now,
        };

        let created = Complaint::from(self.complaints.create(&complaint).await?);
        self.append_audit(
            &created.complaint_id,
            TransactionType::Submission,
            None,
            actor.audit_name(),
        )
        .await?;
        record_transition(&WorkflowAction::Submit.to_string());
        info!(
            complaint_id = %created.complaint_id,
            department = %created.department,
            "Complaint submitted"
        );
        self.notify(&created, WorkflowAction::Submit, &actor.audit_name())
            .await;
        Ok(created)
    }

    /// Record a staff reply and move the complaint to `Replied`.
    pub async fn reply(
        &self,
        actor: Actor,
        complaint_id: &str,
        request: ReplyRequest,
    ) -> Result<Complaint, WorkflowError> {
        request.validate()?;
        let complaint = self.load(complaint_id).await?;
        ensure_assigned_staff(&actor, &complaint)?;
        let target = validate_transition(Some(complaint.status), WorkflowAction::Reply, actor.role)?;

        let update = TransitionUpdate {
            action_taken: Some(request.action_taken.clone()),
            remarks: request.remarks,
            ..TransitionUpdate::to_status(target.into())
        };
        let updated = self
            .commit(complaint_id, complaint.status, WorkflowAction::Reply, update)
            .await?;
        self.append_audit(
            complaint_id,
            TransactionType::Reply,
            Some(request.action_taken),
            actor.audit_name(),
        )
        .await?;
        record_transition(&WorkflowAction::Reply.to_string());
        self.notify(&updated, WorkflowAction::Reply, &actor.audit_name())
            .await;
        Ok(updated)
    }

    /// Send the complaint back to the customer for more information.
    pub async fn request_more_info(
        &self,
        actor: Actor,
        complaint_id: &str,
        request: RequestInfoRequest,
    ) -> Result<Complaint, WorkflowError> {
        request.validate()?;
        let complaint = self.load(complaint_id).await?;
        ensure_assigned_staff(&actor, &complaint)?;
        let target = validate_transition(
            Some(complaint.status),
            WorkflowAction::RequestMoreInfo,
            actor.role,
        )?;

        let update = TransitionUpdate {
            remarks: Some(request.remarks.clone()),
            ..TransitionUpdate::to_status(target.into())
        };
        let updated = self
            .commit(
                complaint_id,
                complaint.status,
                WorkflowAction::RequestMoreInfo,
                update,
            )
            .await?;
        self.append_audit(
            complaint_id,
            TransactionType::StatusUpdate,
            Some(request.remarks),
            actor.audit_name(),
        )
        .await?;
        record_transition(&WorkflowAction::RequestMoreInfo.to_string());
        self.notify(&updated, WorkflowAction::RequestMoreInfo, &actor.audit_name())
            .await;
        Ok(updated)
    }

    /// Customer answers a more-information request, returning to `Pending`.
    pub async fn provide_additional_info(
        &self,
        actor: Actor,
        complaint_id: &str,
        request: AdditionalInfoRequest,
    ) -> Result<Complaint, WorkflowError> {
        request.validate()?;
        let complaint = self.load(complaint_id).await?;
        ensure_owner(&actor, &complaint)?;
        let target = validate_transition(
            Some(complaint.status),
            WorkflowAction::ProvideAdditionalInfo,
            actor.role,
        )?;

        let update = TransitionUpdate {
            additional_info: Some(request.additional_info),
            ..TransitionUpdate::to_status(target.into())
        };
        let updated = self
            .commit(
                complaint_id,
                complaint.status,
                WorkflowAction::ProvideAdditionalInfo,
                update,
            )
            .await?;
        self.append_audit(
            complaint_id,
            TransactionType::AdditionalInfoProvided,
            None,
            actor.audit_name(),
        )
        .await?;
        record_transition(&WorkflowAction::ProvideAdditionalInfo.to_string());
        self.notify(
            &updated,
            WorkflowAction::ProvideAdditionalInfo,
            &actor.audit_name(),
        )
        .await;
        Ok(updated)
    }

    /// Mark a replied complaint as resolved.
    pub async fn approve_resolution(
        &self,
        actor: Actor,
        complaint_id: &str,
    ) -> Result<Complaint, WorkflowError> {
        let complaint = self.load(complaint_id).await?;
        ensure_assigned_staff(&actor, &complaint)?;
        let target = validate_transition(
            Some(complaint.status),
            WorkflowAction::ApproveResolution,
            actor.role,
        )?;

        let updated = self
            .commit(
                complaint_id,
                complaint.status,
                WorkflowAction::ApproveResolution,
                TransitionUpdate::to_status(target.into()),
            )
            .await?;
        self.append_audit(
            complaint_id,
            TransactionType::StatusUpdate,
            Some("Resolution approved".to_string()),
            actor.audit_name(),
        )
        .await?;
        record_transition(&WorkflowAction::ApproveResolution.to_string());
        self.notify(&updated, WorkflowAction::ApproveResolution, &actor.audit_name())
            .await;
        Ok(updated)
    }

    /// Customer rates the handling, which closes the complaint.
    pub async fn submit_feedback(
        &self,
        actor: Actor,
        complaint_id: &str,
        request: FeedbackRequest,
    ) -> Result<Complaint, WorkflowError> {
        request.validate()?;
        let complaint = self.load(complaint_id).await?;
        // Ownership before transition legality: a non-owner always gets
        // AccessDenied, never a hint about the current status.
        ensure_owner(&actor, &complaint)?;
        let target = validate_transition(
            Some(complaint.status),
            WorkflowAction::SubmitFeedback,
            actor.role,
        )?;

        let update = TransitionUpdate {
            rating: Some(request.rating),
            rating_remarks: request.remarks,
            ..TransitionUpdate::to_status(target.into())
        };
        let updated = self
            .commit(
                complaint_id,
                complaint.status,
                WorkflowAction::SubmitFeedback,
                update,
            )
            .await?;
        self.append_audit(
            complaint_id,
            TransactionType::FeedbackSubmitted,
            Some(format!("Rating: {}/5", request.rating)),
            actor.audit_name(),
        )
        .await?;
        record_transition(&WorkflowAction::SubmitFeedback.to_string());
        self.notify(&updated, WorkflowAction::SubmitFeedback, &actor.audit_name())
            .await;
        Ok(updated)
    }

    /// Hand the complaint to another staff member or department queue.
    ///
    /// The status does not change; the compare-and-set still guards against
    /// racing transitions so an assignment never lands on a complaint that
    /// closed underneath it.
    pub async fn assign(
        &self,
        actor: Actor,
        complaint_id: &str,
        request: AssignRequest,
    ) -> Result<Complaint, WorkflowError> {
        request.validate()?;
        let complaint = self.load(complaint_id).await?;
        validate_transition(Some(complaint.status), WorkflowAction::Assign, actor.role)?;

        // Routing to a queue also moves the complaint into that department;
        // routing to an individual keeps the department unchanged.
        let department = match Uuid::parse_str(&request.new_assignee) {
            Ok(_) => None,
            Err(_) => Some(request.new_assignee.as_str()),
        };
        let updated = match self
            .complaints
            .reassign(
                complaint_id,
                complaint.status.into(),
                &request.new_assignee,
                department,
            )
            .await?
        {
            Some(entity) => Complaint::from(entity),
            None => return Err(self.conflict(complaint_id, WorkflowAction::Assign).await?),
        };

        let kind = assignment_audit_type(&request.new_assignee);
        let remarks = match kind {
            TransactionType::Forward => {
                format!("Forwarded to the {} queue", request.new_assignee)
            }
            _ => format!("Assigned to staff member {}", request.new_assignee),
        };
        self.append_audit(complaint_id, kind, Some(remarks), actor.audit_name())
            .await?;
        record_transition(&WorkflowAction::Assign.to_string());
        self.notify(&updated, WorkflowAction::Assign, &actor.audit_name())
            .await;
        Ok(updated)
    }

    /// Fetch one complaint. Customers can only see their own.
    pub async fn get_complaint(
        &self,
        actor: Actor,
        complaint_id: &str,
    ) -> Result<Complaint, WorkflowError> {
        let complaint = self.load(complaint_id).await?;
        if actor.role == ActorRole::Customer {
            ensure_owner(&actor, &complaint)?;
        }
        Ok(complaint)
    }

    /// Paged complaint listing with fresh age-derived priorities.
    ///
    /// Customers are always scoped to their own complaints regardless of the
    /// filter they send.
    pub async fn list_complaints(
        &self,
        actor: Actor,
        query: ListComplaintsQuery,
    ) -> Result<Paged<Complaint>, WorkflowError> {
        self.refresh_priorities().await?;

        let status = query
            .status
            .as_deref()
            .map(|raw| {
                raw.parse::<ComplaintStatus>()
                    .map(ComplaintStatusDb::from)
                    .map_err(WorkflowError::Validation)
            })
            .transpose()?;
        let filter = ComplaintListFilter {
            status,
            department: query.department,
            assigned_to: query.assigned_to,
            customer_id: match actor.role {
                ActorRole::Customer => Some(actor.id),
                _ => query.customer_id,
            },
        };

        let params = PageParams {
            page: query.page,
            per_page: query.per_page,
        };
        let (rows, total) = self
            .complaints
            .list(&filter, params.limit(), params.offset())
            .await?;
        Ok(Paged::new(
            rows.into_iter().map(Complaint::from).collect(),
            params,
            total,
        ))
    }

    /// Full audit trail for one complaint, oldest first.
    pub async fn history(
        &self,
        actor: Actor,
        complaint_id: &str,
    ) -> Result<Vec<Transaction>, WorkflowError> {
        let complaint = self.load(complaint_id).await?;
        if actor.role == ActorRole::Customer {
            ensure_owner(&actor, &complaint)?;
        }
        let rows = self.transactions.list_for_complaint(complaint_id).await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Latest audit entries across all complaints, newest first.
    pub async fn recent_transactions(
        &self,
        query: &RecentTransactionsQuery,
    ) -> Result<Vec<Transaction>, WorkflowError> {
        let kind = parse_type_filter(query.transaction_type.as_deref())?;
        let limit = query.limit.clamp(1, 200);
        let rows = self
            .transactions
            .recent(kind, query.created_by.as_deref(), limit)
            .await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// All matching audit entries in chronological order, for export.
    pub async fn export_transactions(
        &self,
        query: &RecentTransactionsQuery,
    ) -> Result<Vec<Transaction>, WorkflowError> {
        let kind = parse_type_filter(query.transaction_type.as_deref())?;
        let rows = self
            .transactions
            .list_for_export(kind, query.created_by.as_deref(), EXPORT_LIMIT)
            .await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Close replied complaints the customer never came back to.
    ///
    /// Each candidate goes through the regular compare-and-set transition, so
    /// a complaint the customer touches mid-sweep is skipped rather than
    /// stomped. Returns the number of complaints closed.
    pub async fn run_auto_close(&self) -> Result<u64, WorkflowError> {
        let cutoff = Utc::now() - self.auto_close_grace;
        let stale = self.complaints.find_stale_replied(cutoff).await?;
        let mut closed = 0u64;
        for complaint_id in stale {
            match self.auto_close_one(&complaint_id).await {
                Ok(true) => closed += 1,
                Ok(false) => {
                    debug!(%complaint_id, "Complaint changed before auto-close, skipping")
                }
                Err(error) => {
                    error!(%complaint_id, %error, "Auto-close failed for complaint")
                }
            }
        }
        if closed > 0 {
            record_auto_closed(closed);
            info!(closed, "Auto-close sweep finished");
        }
        Ok(closed)
    }

    async fn auto_close_one(&self, complaint_id: &str) -> Result<bool, WorkflowError> {
        let target = validate_transition(
            Some(ComplaintStatus::Replied),
            WorkflowAction::AutoClose,
            ActorRole::System,
        )?;
        let committed = self
            .complaints
            .apply_transition(
                complaint_id,
                ComplaintStatusDb::Replied,
                &TransitionUpdate::to_status(target.into()),
            )
            .await?;
        match committed {
            Some(_) => {
                let remarks = format!(
                    "Closed automatically after {} days awaiting customer confirmation",
                    self.auto_close_grace.num_days()
                );
                self.append_audit(
                    complaint_id,
                    TransactionType::AutoClose,
                    Some(remarks),
                    Actor::system().audit_name(),
                )
                .await?;
                record_transition(&WorkflowAction::AutoClose.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Raise priorities on complaints that aged past the escalation cutoffs.
    pub async fn run_auto_priority(&self) -> Result<u64, WorkflowError> {
        let escalated = self.refresh_priorities().await?;
        if escalated > 0 {
            record_priorities_escalated(escalated);
            info!(escalated, "Priority escalation sweep finished");
        }
        Ok(escalated)
    }

    /// Set-based priority recomputation, shared by the sweep job and the
    /// listing path.
    async fn refresh_priorities(&self) -> Result<u64, WorkflowError> {
        let now = Utc::now();
        let count = self
            .complaints
            .escalate_priorities(
                self.escalation.baseline.into(),
                now - self.escalation.high_after,
                now - self.escalation.critical_after,
            )
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn load(&self, complaint_id: &str) -> Result<Complaint, WorkflowError> {
        self.complaints
            .find_by_id(complaint_id)
            .await?
            .map(Complaint::from)
            .ok_or_else(|| WorkflowError::NotFound(complaint_id.to_string()))
    }

    /// Compare-and-set the status row; on a lost race, report the status the
    /// winner left behind.
    async fn commit(
        &self,
        complaint_id: &str,
        observed: ComplaintStatus,
        action: WorkflowAction,
        update: TransitionUpdate,
    ) -> Result<Complaint, WorkflowError> {
        match self
            .complaints
            .apply_transition(complaint_id, observed.into(), &update)
            .await?
        {
            Some(entity) => Ok(Complaint::from(entity)),
            None => Err(self.conflict(complaint_id, action).await?),
        }
    }

    /// Build the conflict error carrying the status a concurrent writer won
    /// with. A vanished row surfaces as NotFound instead.
    async fn conflict(
        &self,
        complaint_id: &str,
        action: WorkflowAction,
    ) -> Result<WorkflowError, WorkflowError> {
        let current = self.load(complaint_id).await?;
        Ok(WorkflowError::Conflict {
            complaint_id: complaint_id.to_string(),
            observed: current.status,
            action,
        })
    }

    async fn append_audit(
        &self,
        complaint_id: &str,
        kind: TransactionType,
        remarks: Option<String>,
        created_by: String,
    ) -> Result<Transaction, WorkflowError> {
        let mut entry = NewTransaction::new(complaint_id, kind, created_by);
        if let Some(remarks) = remarks {
            entry = entry.with_remarks(remarks);
        }
        match self.transactions.append(&entry).await {
            Ok(row) => Ok(Transaction::from(row)),
            Err(source) => {
                // The state change is already committed at this point.
                error!(
                    complaint_id,
                    transaction_type = %kind,
                    %source,
                    "Audit write failed after a committed state change; log needs reconciliation"
                );
                Err(WorkflowError::AuditWrite {
                    complaint_id: complaint_id.to_string(),
                    source,
                })
            }
        }
    }

    async fn notify(&self, complaint: &Complaint, action: WorkflowAction, acted_by: &str) {
        let event = TransitionEvent {
            complaint_id: complaint.complaint_id.clone(),
            customer_id: complaint.customer_id,
            assigned_to: complaint.assigned_to.clone(),
            action,
            acted_by: acted_by.to_string(),
        };
        self.dispatcher.dispatch_transition(&event).await;
    }
}

/// Department a fresh complaint lands in. A queue name is its own
/// department; an individual assignee goes through the default queue.
fn department_for(assignee: &str, default_queue: &str) -> String {
    if Uuid::parse_str(assignee).is_ok() {
        default_queue.to_string()
    } else {
        assignee.to_string()
    }
}

/// Queue handoffs are audited as forwards, individual handoffs as
/// assignments.
fn assignment_audit_type(new_assignee: &str) -> TransactionType {
    if Uuid::parse_str(new_assignee).is_ok() {
        TransactionType::Assignment
    } else {
        TransactionType::Forward
    }
}

fn parse_type_filter(raw: Option<&str>) -> Result<Option<TransactionTypeDb>, WorkflowError> {
    raw.map(|value| {
        value
            .parse::<TransactionType>()
            .map(TransactionTypeDb::from)
            .map_err(WorkflowError::Validation)
    })
    .transpose()
}
