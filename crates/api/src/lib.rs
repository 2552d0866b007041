//! HTTP API for Complaint Desk.
//!
//! This crate contains:
//! - Axum route handlers and router assembly
//! - The workflow engine and notification dispatch services
//! - Background jobs (auto-close, priority escalation)
//! - Configuration, middleware, and error mapping

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
