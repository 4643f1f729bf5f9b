//! Run outcomes, the configured status mode and mention gating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::csv;
use crate::error::NotifyError;

/// Result of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Run finished successfully
    Success,
    /// Run failed
    Failure,
    /// Run was cancelled
    Cancelled,
}

impl Outcome {
    /// All outcomes, in declaration order.
    pub const ALL: [Self; 3] = [Self::Success, Self::Failure, Self::Cancelled];

    /// Get the Slack attachment color for this outcome.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Success => "good",
            Self::Failure => "danger",
            Self::Cancelled => "warning",
        }
    }

    /// Get the summary line used when no message text is given.
    #[must_use]
    pub const fn canned_text(self) -> &'static str {
        match self {
            Self::Success => ":white_check_mark: Succeeded GitHub Actions\n",
            Self::Failure => ":no_entry: Failed GitHub Actions\n",
            Self::Cancelled => ":warning: Canceled GitHub Actions\n",
        }
    }

    /// Get the input value for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|outcome| outcome.as_str() == value)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| NotifyError::InvalidStatus(s.to_string()))
    }
}

/// How the notification is rendered, taken from the `status` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Fixed layout colored by the run outcome
    Outcome(Outcome),
    /// User-supplied template, no status-driven rendering
    Custom,
    /// No status given; only pre-built bodies can be sent
    Unset,
}

impl Status {
    /// The run outcome, if rendering is status-driven.
    #[must_use]
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Outcome(outcome) => Some(outcome),
            Self::Custom | Self::Unset => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outcome(outcome) => outcome.as_str(),
            Self::Custom => "custom",
            Self::Unset => "",
        }
    }
}

impl FromStr for Status {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::Unset),
            "custom" => Ok(Self::Custom),
            other => Outcome::parse(other)
                .map(Self::Outcome)
                .ok_or_else(|| NotifyError::InvalidStatus(s.to_string())),
        }
    }
}

/// When mentions fire, taken from the `if_mention` input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MentionGate {
    /// Never mention
    #[default]
    Never,
    /// Mention regardless of outcome
    Always,
    /// Mention only for the listed outcomes
    Outcomes(Vec<Outcome>),
}

impl MentionGate {
    /// Parse an `if_mention` value.
    ///
    /// Entries that are neither an outcome nor `always` can never match and
    /// are dropped.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut outcomes = Vec::new();
        for entry in csv::split(value) {
            if entry == "always" {
                return Self::Always;
            }
            if let Some(outcome) = Outcome::parse(entry) {
                outcomes.push(outcome);
            }
        }

        if outcomes.is_empty() {
            Self::Never
        } else {
            Self::Outcomes(outcomes)
        }
    }

    /// Whether mentions fire for `outcome`.
    #[must_use]
    pub fn allows(&self, outcome: Outcome) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Outcomes(outcomes) => outcomes.contains(&outcome),
        }
    }
}
