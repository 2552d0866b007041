//! Application services: workflow orchestration and outbound delivery.

pub mod email;
pub mod notification;
pub mod workflow;

pub use email::EmailService;
pub use notification::NotificationDispatcher;
pub use workflow::WorkflowEngine;
