//! Notification channel implementations.

pub mod slack;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::NotifyError;
use crate::payload::Payload;
use crate::template::RenderedMessage;

/// A fully built notification body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Plain text, sent as `{"text": ...}`
    Text(String),
    /// Status-driven payload
    Payload(Payload),
    /// Custom template output
    Rendered(RenderedMessage),
}

impl Message {
    /// JSON body to post.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn to_json(&self) -> Result<Value, NotifyError> {
        Ok(match self {
            Self::Text(text) => json!({ "text": text }),
            Self::Payload(payload) => serde_json::to_value(payload)?,
            Self::Rendered(rendered) => serde_json::to_value(rendered)?,
        })
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Payload> for Message {
    fn from(payload: Payload) -> Self {
        Self::Payload(payload)
    }
}

impl From<RenderedMessage> for Message {
    fn from(rendered: RenderedMessage) -> Self {
        Self::Rendered(rendered)
    }
}

/// Trait for notification channels (Slack, etc.).
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Deliver a message body as-is.
    async fn send(&self, message: &Message) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_body() {
        let message = Message::from("payload");
        assert_eq!(message.to_json().unwrap(), json!({ "text": "payload" }));
    }

    #[test]
    fn test_rendered_message_body() {
        let message = Message::from(RenderedMessage::text_only("hi"));
        assert_eq!(message.to_json().unwrap(), json!({ "text": "hi" }));
    }
}
