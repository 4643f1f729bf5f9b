//! Notification inputs.

/// Inputs controlling how the notification is rendered.
///
/// Values are kept as given; parsing happens when the client is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    /// `success`, `failure`, `cancelled`, `custom` or empty
    pub status: String,
    /// Comma-separated field ids, or `all`
    pub fields: String,
    /// Comma-separated mention targets
    pub mention: String,
    /// Outcomes that trigger mentions, or `always`
    pub if_mention: String,
    pub author_name: String,
    pub username: String,
    pub icon_emoji: String,
    pub icon_url: String,
    pub channel: String,
}
