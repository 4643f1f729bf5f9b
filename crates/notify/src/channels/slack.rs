//! Slack incoming-webhook channel.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::channels::{Message, NotifyChannel};
use crate::error::NotifyError;

/// Environment variable for the Slack webhook URL.
pub const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Slack webhook notification channel.
#[derive(Debug, Clone)]
pub struct SlackChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a Slack channel for a webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::MissingSecret`] if the URL is absent or empty.
    pub fn new(webhook_url: Option<String>) -> Result<Self, NotifyError> {
        let webhook_url = webhook_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(NotifyError::MissingSecret(ENV_SLACK_WEBHOOK_URL))?;

        Ok(Self {
            webhook_url,
            client: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let body = message.to_json()?;

        debug!(channel = "slack", body = %body, "Sending notification");

        let response = self.client.post(&self.webhook_url).json(&body).send().await?;

        if response.status().is_success() {
            debug!(channel = "slack", "Notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack webhook request failed"
            );

            Err(NotifyError::Delivery {
                status: status.as_u16(),
                body,
            })
        }
    }
}
