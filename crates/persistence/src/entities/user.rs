//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ActorRole, User};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        User {
            id: entity.id,
            display_name: entity.display_name,
            email: entity.email,
            email_verified: entity.email_verified,
            role: entity.role.parse().unwrap_or(ActorRole::Customer),
            department: entity.department,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
