//! Complaint repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::Complaint;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ComplaintEntity, ComplaintPriorityDb, ComplaintStatusDb};
use crate::metrics::QueryTimer;

/// Optional filters for complaint listings.
#[derive(Debug, Clone, Default)]
pub struct ComplaintListFilter {
    pub status: Option<ComplaintStatusDb>,
    pub department: Option<String>,
    pub assigned_to: Option<String>,
    pub customer_id: Option<Uuid>,
}

/// Field changes carried by a status transition. `None` fields keep the
/// stored value; the guarded UPDATE applies everything in one statement.
#[derive(Debug, Clone)]
pub struct TransitionUpdate {
    pub status: ComplaintStatusDb,
    pub action_taken: Option<String>,
    pub remarks: Option<String>,
    pub additional_info: Option<String>,
    pub rating: Option<i16>,
    pub rating_remarks: Option<String>,
}

impl TransitionUpdate {
    /// A transition that only moves the status.
    pub fn to_status(status: ComplaintStatusDb) -> Self {
        Self {
            status,
            action_taken: None,
            remarks: None,
            additional_info: None,
            rating: None,
            rating_remarks: None,
        }
    }
}

/// Helper struct for building dynamic WHERE clauses from listing filters.
/// Tracks conditions and parameter positions to avoid code duplication.
struct ComplaintFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl ComplaintFilterBuilder {
    fn build(filter: &ComplaintListFilter) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if filter.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if filter.department.is_some() {
            param_count += 1;
            conditions.push(format!("department = ${}", param_count));
        }

        if filter.assigned_to.is_some() {
            param_count += 1;
            conditions.push(format!("assigned_to = ${}", param_count));
        }

        if filter.customer_id.is_some() {
            param_count += 1;
            conditions.push(format!("customer_id = ${}", param_count));
        }

        Self {
            conditions,
            param_count,
        }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind listing filter parameters to a SQLx builder.
/// This avoids code duplication for binding optional filter parameters.
macro_rules! bind_list_filters {
    ($builder:expr, $filter:expr) => {{
        let mut b = $builder;
        if let Some(status) = $filter.status {
            b = b.bind(status);
        }
        if let Some(ref department) = $filter.department {
            b = b.bind(department);
        }
        if let Some(ref assigned_to) = $filter.assigned_to {
            b = b.bind(assigned_to);
        }
        if let Some(customer_id) = $filter.customer_id {
            b = b.bind(customer_id);
        }
        b
    }};
}

/// Repository for complaint-related database operations.
#[derive(Clone)]
pub struct ComplaintRepository {
    pool: PgPool,
}

impl ComplaintRepository {
    /// Creates a new ComplaintRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a freshly submitted complaint.
    pub async fn create(&self, complaint: &Complaint) -> Result<ComplaintEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_complaint");
        let result = sqlx::query_as::<_, ComplaintEntity>(
            r#"
            INSERT INTO complaints (
                complaint_id, customer_id, status, priority, category, complaint_type,
                subtype, description, location, department, assigned_to
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING complaint_id, customer_id, status, priority, category, complaint_type,
                      subtype, description, location, department, assigned_to, action_taken,
                      remarks, additional_info, rating, rating_remarks, created_at, updated_at
            "#,
        )
        .bind(&complaint.complaint_id)
        .bind(complaint.customer_id)
        .bind(ComplaintStatusDb::from(complaint.status))
        .bind(ComplaintPriorityDb::from(complaint.priority))
        .bind(&complaint.category)
        .bind(&complaint.complaint_type)
        .bind(complaint.subtype.as_deref())
        .bind(&complaint.description)
        .bind(complaint.location.as_deref())
        .bind(&complaint.department)
        .bind(&complaint.assigned_to)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a complaint by its public identifier.
    pub async fn find_by_id(
        &self,
        complaint_id: &str,
    ) -> Result<Option<ComplaintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_complaint_by_id");
        let result = sqlx::query_as::<_, ComplaintEntity>(
            r#"
            SELECT complaint_id, customer_id, status, priority, category, complaint_type,
                   subtype, description, location, department, assigned_to, action_taken,
                   remarks, additional_info, rating, rating_remarks, created_at, updated_at
            FROM complaints
            WHERE complaint_id = $1
            "#,
        )
        .bind(complaint_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List complaints with pagination and filtering, newest first.
    /// Returns the page of rows plus the total match count.
    pub async fn list(
        &self,
        filter: &ComplaintListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ComplaintEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_complaints");

        let builder = ComplaintFilterBuilder::build(filter);
        let where_clause = builder.where_clause();
        let param_count = builder.param_count();

        let count_query = format!("SELECT COUNT(*) FROM complaints WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_list_filters!(count_builder, filter);
        let total = match count_builder.fetch_one(&self.pool).await {
            Ok(total) => total,
            Err(e) => {
                timer.record();
                return Err(e);
            }
        };

        let list_query = format!(
            r#"
            SELECT complaint_id, customer_id, status, priority, category, complaint_type,
                   subtype, description, location, department, assigned_to, action_taken,
                   remarks, additional_info, rating, rating_remarks, created_at, updated_at
            FROM complaints
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );

        let list_builder = sqlx::query_as::<_, ComplaintEntity>(&list_query);
        let list_builder = bind_list_filters!(list_builder, filter);
        let result = list_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map(|rows| (rows, total));
        timer.record();
        result
    }

    /// Apply a status transition guarded by the status the caller observed.
    /// Returns `None` when the row is missing or another writer got there
    /// first; the caller re-reads to tell the two apart.
    pub async fn apply_transition(
        &self,
        complaint_id: &str,
        expected: ComplaintStatusDb,
        update: &TransitionUpdate,
    ) -> Result<Option<ComplaintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("apply_complaint_transition");
        let result = sqlx::query_as::<_, ComplaintEntity>(
            r#"
            UPDATE complaints
            SET status = $3,
                action_taken = COALESCE($4, action_taken),
                remarks = COALESCE($5, remarks),
                additional_info = COALESCE($6, additional_info),
                rating = COALESCE($7, rating),
                rating_remarks = COALESCE($8, rating_remarks),
                updated_at = NOW()
            WHERE complaint_id = $1 AND status = $2
            RETURNING complaint_id, customer_id, status, priority, category, complaint_type,
                      subtype, description, location, department, assigned_to, action_taken,
                      remarks, additional_info, rating, rating_remarks, created_at, updated_at
            "#,
        )
        .bind(complaint_id)
        .bind(expected)
        .bind(update.status)
        .bind(update.action_taken.as_deref())
        .bind(update.remarks.as_deref())
        .bind(update.additional_info.as_deref())
        .bind(update.rating)
        .bind(update.rating_remarks.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reassign a complaint, guarded by the status the caller observed.
    /// The department moves with the assignee when a queue is given.
    pub async fn reassign(
        &self,
        complaint_id: &str,
        expected: ComplaintStatusDb,
        assigned_to: &str,
        department: Option<&str>,
    ) -> Result<Option<ComplaintEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reassign_complaint");
        let result = sqlx::query_as::<_, ComplaintEntity>(
            r#"
            UPDATE complaints
            SET assigned_to = $3, department = COALESCE($4, department), updated_at = NOW()
            WHERE complaint_id = $1 AND status = $2
            RETURNING complaint_id, customer_id, status, priority, category, complaint_type,
                      subtype, description, location, department, assigned_to, action_taken,
                      remarks, additional_info, rating, rating_remarks, created_at, updated_at
            "#,
        )
        .bind(complaint_id)
        .bind(expected)
        .bind(assigned_to)
        .bind(department)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Identifiers of replied complaints whose last transition predates the
    /// cutoff, oldest first. Feeds the auto-close sweep.
    pub async fn find_stale_replied(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("find_stale_replied_complaints");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT complaint_id
            FROM complaints
            WHERE status = 'replied' AND updated_at < $1
            ORDER BY updated_at ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Raise priorities on open complaints by age in a single statement.
    /// Priorities only ever move up, closed complaints are left alone, and
    /// updated_at stays untouched because no status changed. Returns the
    /// number of rows whose priority actually rose.
    pub async fn escalate_priorities(
        &self,
        baseline: ComplaintPriorityDb,
        high_cutoff: DateTime<Utc>,
        critical_cutoff: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("escalate_complaint_priorities");
        let result = sqlx::query(
            r#"
            UPDATE complaints
            SET priority = GREATEST(priority, CASE
                    WHEN created_at <= $1 THEN 'critical'::complaint_priority
                    WHEN created_at <= $2 THEN 'high'::complaint_priority
                    ELSE $3 END)
            WHERE status <> 'closed'
              AND priority < CASE
                    WHEN created_at <= $1 THEN 'critical'::complaint_priority
                    WHEN created_at <= $2 THEN 'high'::complaint_priority
                    ELSE $3 END
            "#,
        )
        .bind(critical_cutoff)
        .bind(high_cutoff)
        .bind(baseline)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() as i64);
        timer.record();
        result
    }
}
