//! Repository implementations for database operations.

pub mod complaint;
pub mod notification;
pub mod transaction;
pub mod user;

pub use complaint::{ComplaintListFilter, ComplaintRepository, TransitionUpdate};
pub use notification::NotificationRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
