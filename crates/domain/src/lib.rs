//! Domain layer for Complaint Desk.
//!
//! This crate contains:
//! - Domain models (Complaint, Transaction, Notification, User)
//! - Pure workflow services (transition rules, escalation, drafting)
//! - Domain error types

pub mod models;
pub mod services;
