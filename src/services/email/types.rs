// Email Service Types - Shared types and structures for email module

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during email operations
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Template rendering error: {0}")]
    TemplateError(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generic email message structure that can be sent
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

impl EmailMessage {
    pub fn new(from: String, to: Vec<String>, subject: String, html: String) -> Self {
        Self {
            from,
            to,
            subject,
            html,
            text: None,
            reply_to: None,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }
}

/// Trait that all email builders must implement
pub trait EmailBuilder {
    /// Build the email message
    fn build(&self) -> Result<EmailMessage, EmailError>;
}

/// Data structure for the application-status notification template
#[derive(Serialize)]
pub struct ApplicationStatusEmailData {
    pub candidate_name: String,
    pub job_title: String,
    pub status_label: String,
    pub actor_display: String,
    pub app_name: String,
    pub dashboard_url: String,
}

/// Data structure for the application-removed notification template
#[derive(Serialize)]
pub struct ApplicationRemovedEmailData {
    pub recipient_name: String,
    pub job_title: String,
    pub reason: String,
    pub app_name: String,
    pub dashboard_url: String,
}

/// Wire payload for the Resend-style HTTP API
#[derive(Debug, Clone, Serialize)]
pub struct ProviderEmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl From<EmailMessage> for ProviderEmailPayload {
    fn from(message: EmailMessage) -> Self {
        Self {
            from: message.from,
            to: message.to,
            subject: message.subject,
            html: message.html,
            text: message.text,
            reply_to: message.reply_to,
        }
    }
}
