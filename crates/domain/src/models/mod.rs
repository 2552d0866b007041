//! Domain models for Complaint Desk.

pub mod actor;
pub mod complaint;
pub mod notification;
pub mod transaction;
pub mod user;

pub use actor::{Actor, ActorRole};
pub use complaint::{
    AdditionalInfoRequest, AssignRequest, Complaint, ComplaintPriority, ComplaintStatus,
    FeedbackRequest, ListComplaintsQuery, ReplyRequest, RequestInfoRequest, SubmitComplaintRequest,
};
pub use notification::{
    AnnouncementRequest, AnnouncementResponse, NewNotification, Notification, NotificationListQuery,
    NotificationType, UnreadCountResponse,
};
pub use transaction::{
    ExportFormat, ExportTransactionsQuery, ExportTransactionsResponse, NewTransaction,
    RecentTransactionsQuery, Transaction, TransactionType, TransactionsResponse,
};
pub use user::User;
