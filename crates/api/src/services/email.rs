//! Email delivery for workflow notifications.
//!
//! Supports multiple providers:
//! - `console`: Logs emails to the application log (development)
//! - `smtp`: Logs what would be sent; full SMTP transport is pending
//! - `sendgrid`: Uses the SendGrid API

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body: String,
}

/// Email service for sending workflow emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email sending is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Base URL prepended to complaint links in bodies.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Pause between messages in a bulk send.
    pub fn send_delay_ms(&self) -> u64 {
        self.config.send_delay_ms
    }

    /// Send an email message.
    ///
    /// A disabled service accepts and drops the message so callers never
    /// need to special-case configuration.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        if message.to.is_empty() || !message.to.contains('@') {
            return Err(EmailError::InvalidAddress(message.to));
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Console provider - logs the full message.
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Email (console provider)"
        );
        Ok(())
    }

    /// SMTP provider - placeholder pending a real transport.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        warn!(
            provider = "smtp",
            host = %self.config.smtp_host,
            port = %self.config.smtp_port,
            "SMTP provider configured but full implementation requires lettre crate"
        );

        info!(
            to = %message.to,
            subject = %message.subject,
            smtp_host = %self.config.smtp_host,
            "Email would be sent via SMTP (full implementation pending)"
        );

        Ok(())
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let mut to = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            to["name"] = serde_json::json!(name);
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [to] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body
            }]
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}
