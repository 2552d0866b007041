//! HTTP route handlers.

pub mod announcements;
pub mod complaints;
pub mod health;
pub mod notifications;
pub mod transactions;
