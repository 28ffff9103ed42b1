// Email Sender - Generic email sending functionality
// Handles the actual delivery of messages through the HTTP email provider

use super::types::{EmailError, EmailMessage, ProviderEmailPayload};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Generic email sender that handles delivery to the email provider
#[derive(Clone)]
pub struct EmailSender {
    client: Arc<Client>,
    api_key: String,
    api_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl EmailSender {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            api_url,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Set maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set delay between retries
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Send an email message
    #[instrument(skip(self, message), fields(to = ?message.to, subject = %message.subject))]
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let payload: ProviderEmailPayload = message.into();

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                info!("Email sent successfully");
                Ok(())
            },
            Ok(res) => {
                let status = res.status();
                let error_text = res
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                error!(
                    "Failed to send email. Status: {}, Error: {}",
                    status, error_text
                );

                if status.as_u16() == 429 {
                    Err(EmailError::RateLimitExceeded)
                } else if status.is_server_error() {
                    Err(EmailError::ServiceUnavailable)
                } else {
                    Err(EmailError::SendError(format!(
                        "Email send failed with status {}: {}",
                        status, error_text
                    )))
                }
            },
            Err(e) => {
                error!("Network error while sending email: {:?}", e);
                Err(EmailError::SendError(format!("Network error: {}", e)))
            },
        }
    }

    /// Send an email with automatic retry on failure
    #[instrument(skip(self, message), fields(to = ?message.to, subject = %message.subject))]
    pub async fn send_with_retry(&self, message: EmailMessage) -> Result<(), EmailError> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.send(message.clone()).await {
                Ok(()) => return Ok(()),
                Err(EmailError::RateLimitExceeded) => {
                    warn!("Rate limit hit, not retrying");
                    return Err(EmailError::RateLimitExceeded);
                },
                Err(e) => {
                    warn!("Email send attempt {} failed: {:?}", attempt, e);
                    last_error = Some(e);

                    if attempt < self.max_retries {
                        // Exponential backoff, capped at 60 seconds
                        let max_delay = Duration::from_secs(60);
                        let exp = (2_u32).checked_pow(attempt - 1).unwrap_or(u32::MAX);
                        let delay = self
                            .retry_delay
                            .checked_mul(exp)
                            .unwrap_or(max_delay)
                            .min(max_delay);

                        info!("Retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                    }
                },
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmailError::SendError("Failed after maximum retry attempts".to_string())
        }))
    }
}
