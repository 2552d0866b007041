//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod complaint;
pub mod notification;
pub mod transaction;
pub mod user;

pub use complaint::{ComplaintEntity, ComplaintPriorityDb, ComplaintStatusDb};
pub use notification::NotificationEntity;
pub use transaction::{TransactionEntity, TransactionTypeDb};
pub use user::UserEntity;
