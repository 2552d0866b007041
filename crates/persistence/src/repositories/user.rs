//! User repository for database operations.
//!
//! Accounts are provisioned by the identity system sharing this database;
//! complaint handling only reads them.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, display_name, email, email_verified, role, department, is_active,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active staff and admin users working a department queue.
    pub async fn staff_in_department(
        &self,
        department: &str,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_staff_in_department");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, display_name, email, email_verified, role, department, is_active,
                   created_at, updated_at
            FROM users
            WHERE department = $1 AND role IN ('staff', 'admin') AND is_active = TRUE
            ORDER BY display_name ASC
            "#,
        )
        .bind(department)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All active users, for service-wide announcements.
    pub async fn list_active(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_users");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, display_name, email, email_verified, role, department, is_active,
                   created_at, updated_at
            FROM users
            WHERE is_active = TRUE
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
