// Email Builders - Builders for different types of emails
// Each builder knows how to construct its specific email type

use super::types::{
    ApplicationRemovedEmailData, ApplicationStatusEmailData, EmailBuilder, EmailError,
    EmailMessage,
};
use crate::app_config::EmailConfig;
use handlebars::Handlebars;
use tracing::instrument;

/// Builder for application-status notifications sent to the candidate
/// after a shortlist/reject transition
pub struct ApplicationStatusEmailBuilder<'a> {
    to_email: &'a str,
    candidate_name: &'a str,
    job_title: &'a str,
    status_label: &'a str,
    actor_display: &'a str,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> ApplicationStatusEmailBuilder<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        to_email: &'a str,
        candidate_name: &'a str,
        job_title: &'a str,
        status_label: &'a str,
        actor_display: &'a str,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            to_email,
            candidate_name,
            job_title,
            status_label,
            actor_display,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for ApplicationStatusEmailBuilder<'a> {
    #[instrument(skip(self))]
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = ApplicationStatusEmailData {
            candidate_name: self.candidate_name.to_string(),
            job_title: self.job_title.to_string(),
            status_label: self.status_label.to_string(),
            actor_display: self.actor_display.to_string(),
            app_name: self.config.from_name.clone(),
            dashboard_url: self.config.dashboard_url.clone(),
        };

        let html = self
            .templates
            .render("application_status", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        let text = format!(
            "Hi {},\n\n\
            Your application for \"{}\" was {} by {}.\n\n\
            Sign in to {} to see the details.\n\n\
            Best regards,\n\
            The {} Team",
            self.candidate_name,
            self.job_title,
            self.status_label,
            self.actor_display,
            data.dashboard_url,
            self.config.from_name
        );

        Ok(EmailMessage::new(
            format!("{} <{}>", self.config.from_name, self.config.from_email),
            vec![self.to_email.to_string()],
            format!(
                "Your application for {} was {}",
                self.job_title, self.status_label
            ),
            html,
        )
        .with_text(text))
    }
}

/// Builder for notifications sent when an application is withdrawn by the
/// candidate or deleted by the employer
pub struct ApplicationRemovedEmailBuilder<'a> {
    to_email: &'a str,
    recipient_name: &'a str,
    job_title: &'a str,
    reason: &'a str,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> ApplicationRemovedEmailBuilder<'a> {
    pub fn new(
        to_email: &'a str,
        recipient_name: &'a str,
        job_title: &'a str,
        reason: &'a str,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            to_email,
            recipient_name,
            job_title,
            reason,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for ApplicationRemovedEmailBuilder<'a> {
    #[instrument(skip(self))]
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = ApplicationRemovedEmailData {
            recipient_name: self.recipient_name.to_string(),
            job_title: self.job_title.to_string(),
            reason: self.reason.to_string(),
            app_name: self.config.from_name.clone(),
            dashboard_url: self.config.dashboard_url.clone(),
        };

        let html = self
            .templates
            .render("application_removed", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        let text = format!(
            "Hi {},\n\n\
            The application for \"{}\" has been removed: {}.\n\n\
            Best regards,\n\
            The {} Team",
            self.recipient_name, self.job_title, self.reason, self.config.from_name
        );

        Ok(EmailMessage::new(
            format!("{} <{}>", self.config.from_name, self.config.from_email),
            vec![self.to_email.to_string()],
            format!("Application update for {}", self.job_title),
            html,
        )
        .with_text(text))
    }
}
