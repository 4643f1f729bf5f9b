//! Error types for the notification system.

use thiserror::Error;

/// Errors raised while configuring, rendering or delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required secret was not provided
    #[error("Specify secrets.{0}")]
    MissingSecret(&'static str),

    /// Status is unknown, or not usable for the requested operation
    #[error("invalid status: {0:?}")]
    InvalidStatus(String),

    /// Custom template could not be rendered
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook answered with a non-success status
    #[error("Webhook returned {status}: {body}")]
    Delivery { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NotifyError {
    /// Whether this error comes from configuration rather than rendering or delivery.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingSecret(_) | Self::InvalidStatus(_))
    }
}

/// Errors produced by the custom template renderer.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template references a name outside the placeholder catalog
    #[error("unknown template placeholder: {0}")]
    UnknownPlaceholder(String),

    /// The template is not valid interpolation syntax
    #[error("invalid template syntax: {0}")]
    Syntax(String),

    /// The template declares a structure that cannot be sent as a message
    #[error("template must describe an object, got {0}")]
    Shape(&'static str),
}

pub type Result<T, E = NotifyError> = std::result::Result<T, E>;
