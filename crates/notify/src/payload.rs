//! Slack webhook payload for the fixed, status-driven layout.

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::fields::{expand_fields, Field};
use crate::metadata::RunMetadata;
use crate::status::Outcome;

// =============================================================================
// Slack API types
// =============================================================================

/// Notification body sent to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(default)]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    #[must_use]
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// Summary line: mention prefix followed by the message, or by the canned
/// line for `outcome` when the message is empty.
#[must_use]
pub fn inject_text(outcome: Outcome, mention_prefix: &str, message: &str) -> String {
    let body = if message.is_empty() {
        outcome.canned_text()
    } else {
        message
    };
    format!("{mention_prefix}{body}")
}

/// Builds status-driven payloads from a fixed field selection and appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayloadBuilder {
    fields: Vec<Field>,
    author_name: String,
    username: String,
    icon_emoji: String,
    icon_url: String,
    channel: String,
}

impl PayloadBuilder {
    /// Create a builder for the given `fields` input, with no cosmetic overrides.
    #[must_use]
    pub fn new(fields: &str) -> Self {
        Self {
            fields: expand_fields(fields),
            ..Self::default()
        }
    }

    /// Create a builder from the full client configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            fields: expand_fields(&config.fields),
            author_name: config.author_name.clone(),
            username: config.username.clone(),
            icon_emoji: config.icon_emoji.clone(),
            icon_url: config.icon_url.clone(),
            channel: config.channel.clone(),
        }
    }

    /// Build the payload for `outcome`.
    #[must_use]
    pub fn build(
        &self,
        outcome: Outcome,
        mention_prefix: &str,
        message: &str,
        metadata: &RunMetadata,
    ) -> Payload {
        let fields = self
            .fields
            .iter()
            .map(|field| AttachmentField::new(field.id(), field.value(metadata)))
            .collect();

        Payload {
            text: inject_text(outcome, mention_prefix, message),
            username: self.username.clone(),
            icon_emoji: self.icon_emoji.clone(),
            icon_url: self.icon_url.clone(),
            channel: self.channel.clone(),
            attachments: vec![Attachment {
                color: outcome.color().to_string(),
                author_name: self.author_name.clone(),
                fields,
            }],
        }
    }
}
