//! Mention prefix resolution.

use crate::csv;
use crate::status::{MentionGate, Outcome};

/// A single mention target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionTarget {
    /// A user id, rendered `<@id>`
    User(String),
    /// `here` or `channel`, rendered `<!here>` / `<!channel>`
    Broadcast(String),
    /// `subteam^<group-id>`, rendered `<!subteam^group-id>`
    Group(String),
}

impl MentionTarget {
    /// Classify a target. Anything unrecognized is taken as a user id.
    #[must_use]
    pub fn parse(target: &str) -> Self {
        match target {
            "here" | "channel" => Self::Broadcast(target.to_string()),
            group if group.starts_with("subteam^") => Self::Group(group.to_string()),
            user => Self::User(user.to_string()),
        }
    }

    /// Render the Slack mention token.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::User(id) => format!("<@{id}>"),
            Self::Broadcast(name) | Self::Group(name) => format!("<!{name}>"),
        }
    }
}

/// Resolves the mention prefix for a fixed `(mention, if_mention)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MentionResolver {
    targets: Vec<MentionTarget>,
    gate: MentionGate,
}

impl MentionResolver {
    #[must_use]
    pub fn new(mention: &str, if_mention: &str) -> Self {
        let gate = MentionGate::parse(if_mention);
        let targets = if gate == MentionGate::Never {
            Vec::new()
        } else {
            csv::split(mention).map(MentionTarget::parse).collect()
        };
        Self { targets, gate }
    }

    /// Mention prefix for `outcome`: the tokens joined by spaces plus a
    /// trailing space, or an empty string when nothing is mentioned.
    #[must_use]
    pub fn mention_text(&self, outcome: Outcome) -> String {
        if self.targets.is_empty() || !self.gate.allows(outcome) {
            return String::new();
        }

        let mut text = self
            .targets
            .iter()
            .map(MentionTarget::token)
            .collect::<Vec<_>>()
            .join(" ");
        text.push(' ');
        text
    }
}
