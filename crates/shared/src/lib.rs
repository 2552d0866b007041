//! Shared utilities and common types for Complaint Desk.
//!
//! This crate provides common functionality used across all other crates:
//! - Identifier generation for complaints and audit transactions
//! - Common validation logic
//! - Offset pagination helpers for listing endpoints

pub mod ids;
pub mod pagination;
pub mod validation;
