// Email Service Module
// Best-effort notification delivery; callers fire these after commit and
// log failures without rolling anything back

pub mod builders;
pub mod sender;
pub mod types;

use self::types::EmailBuilder;
use crate::app_config::EmailConfig;
use anyhow::Result;
use builders::{ApplicationRemovedEmailBuilder, ApplicationStatusEmailBuilder};
use handlebars::Handlebars;
use sender::EmailSender;
use std::sync::Arc;
use tracing::{info, instrument};

pub use types::EmailError;

/// Email service for sending lifecycle notifications
#[derive(Clone)]
pub struct EmailService {
    sender: EmailSender,
    config: EmailConfig,
    templates: Arc<Handlebars<'static>>,
}

impl EmailService {
    /// Create a new email service instance
    pub fn new(config: EmailConfig) -> Result<Self> {
        let mut templates = Handlebars::new();

        Self::register_templates(&mut templates)?;

        let sender = EmailSender::new(config.api_key.clone(), config.api_url.clone())
            .with_max_retries(3)
            .with_retry_delay(std::time::Duration::from_secs(1));

        Ok(Self {
            sender,
            config,
            templates: Arc::new(templates),
        })
    }

    /// Register all email templates
    fn register_templates(templates: &mut Handlebars) -> Result<(), types::EmailError> {
        let status_template = include_str!("../../templates/email/application_status.html");
        templates
            .register_template_string("application_status", status_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        let removed_template = include_str!("../../templates/email/application_removed.html");
        templates
            .register_template_string("application_removed", removed_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        Ok(())
    }

    /// Notify a candidate that their application was shortlisted/rejected,
    /// naming whoever caused the transition
    #[instrument(skip(self))]
    pub async fn send_application_status_email(
        &self,
        to_email: &str,
        candidate_name: &str,
        job_title: &str,
        status_label: &str,
        actor_display: &str,
    ) -> Result<(), types::EmailError> {
        info!("Sending application status email to {}", to_email);

        let builder = ApplicationStatusEmailBuilder::new(
            to_email,
            candidate_name,
            job_title,
            status_label,
            actor_display,
            &self.config,
            &self.templates,
        );

        let message = builder.build()?;
        self.sender.send_with_retry(message).await
    }

    /// Notify a party that an application was withdrawn or deleted
    #[instrument(skip(self))]
    pub async fn send_application_removed_email(
        &self,
        to_email: &str,
        recipient_name: &str,
        job_title: &str,
        reason: &str,
    ) -> Result<(), types::EmailError> {
        info!("Sending application removed email to {}", to_email);

        let builder = ApplicationRemovedEmailBuilder::new(
            to_email,
            recipient_name,
            job_title,
            reason,
            &self.config,
            &self.templates,
        );

        let message = builder.build()?;
        self.sender.send_with_retry(message).await
    }
}
