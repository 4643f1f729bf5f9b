//! Notification client: mentions, payload or template rendering, delivery.

use std::sync::Arc;

use tracing::debug;

use crate::channels::slack::SlackChannel;
use crate::channels::{Message, NotifyChannel};
use crate::config::ClientConfig;
use crate::error::{NotifyError, Result};
use crate::mention::MentionResolver;
use crate::metadata::MetadataSource;
use crate::payload::{inject_text, Payload, PayloadBuilder};
use crate::status::{Outcome, Status};
use crate::template::{RenderedMessage, TemplateRenderer};

/// Builds and delivers the notification for one run.
pub struct Client {
    status: Status,
    mentions: MentionResolver,
    builder: PayloadBuilder,
    renderer: TemplateRenderer,
    metadata: Arc<dyn MetadataSource>,
    channel: Arc<dyn NotifyChannel>,
}

impl Client {
    /// Create a client delivering to a Slack webhook.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::MissingSecret`] without a webhook URL and
    /// [`NotifyError::InvalidStatus`] for an unknown status.
    pub fn new(
        config: &ClientConfig,
        metadata: Arc<dyn MetadataSource>,
        webhook_url: Option<String>,
    ) -> Result<Self> {
        let channel = SlackChannel::new(webhook_url)?;
        Self::with_channel(config, metadata, Arc::new(channel))
    }

    /// Create a client delivering to an arbitrary channel.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidStatus`] for an unknown status.
    pub fn with_channel(
        config: &ClientConfig,
        metadata: Arc<dyn MetadataSource>,
        channel: Arc<dyn NotifyChannel>,
    ) -> Result<Self> {
        Ok(Self {
            status: config.status.parse()?,
            mentions: MentionResolver::new(&config.mention, &config.if_mention),
            builder: PayloadBuilder::from_config(config),
            renderer: TemplateRenderer::new(),
            metadata,
            channel,
        })
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    fn outcome(&self) -> Result<Outcome> {
        self.status
            .outcome()
            .ok_or_else(|| NotifyError::InvalidStatus(self.status.as_str().to_string()))
    }

    /// Attachment color for the configured outcome.
    ///
    /// # Errors
    ///
    /// Fails in custom or unset mode.
    pub fn inject_color(&self) -> Result<&'static str> {
        Ok(self.outcome()?.color())
    }

    /// Summary line for the configured outcome, mention prefix included.
    ///
    /// # Errors
    ///
    /// Fails in custom or unset mode.
    pub fn inject_text(&self, message: &str) -> Result<String> {
        let outcome = self.outcome()?;
        Ok(inject_text(outcome, &self.mention_text(outcome), message))
    }

    /// Mention prefix for `outcome`.
    #[must_use]
    pub fn mention_text(&self, outcome: Outcome) -> String {
        self.mentions.mention_text(outcome)
    }

    /// Build the status-driven payload.
    ///
    /// # Errors
    ///
    /// Fails in custom or unset mode.
    pub async fn prepare(&self, message: &str) -> Result<Payload> {
        let outcome = self.outcome()?;
        let metadata = self.metadata.fetch().await;
        let prefix = self.mention_text(outcome);
        Ok(self.builder.build(outcome, &prefix, message, &metadata))
    }

    /// Render a custom template.
    ///
    /// # Errors
    ///
    /// Fails outside custom mode, or when the template cannot be rendered.
    pub async fn custom(&self, template: &str) -> Result<RenderedMessage> {
        if self.status != Status::Custom {
            return Err(NotifyError::InvalidStatus(self.status.as_str().to_string()));
        }
        let metadata = self.metadata.fetch().await;
        Ok(self.renderer.render(template, &metadata)?)
    }

    /// Deliver a body as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the webhook rejects it.
    pub async fn send(&self, message: impl Into<Message>) -> Result<()> {
        let message = message.into();
        debug!(channel = self.channel.name(), "Delivering notification");
        self.channel.send(&message).await
    }
}
