//! Optional field blocks attached to the notification.

use std::fmt;

use crate::csv;
use crate::metadata::{link, RunMetadata};

/// A field from the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Repo,
    Message,
    Commit,
    Author,
    Job,
    Action,
    EventName,
    Ref,
    Workflow,
    Took,
}

impl Field {
    /// The full catalog, in canonical order.
    pub const CATALOG: [Self; 10] = [
        Self::Repo,
        Self::Message,
        Self::Commit,
        Self::Author,
        Self::Job,
        Self::Action,
        Self::EventName,
        Self::Ref,
        Self::Workflow,
        Self::Took,
    ];

    /// Identifier used in the `fields` input and as the block title.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Message => "message",
            Self::Commit => "commit",
            Self::Author => "author",
            Self::Job => "job",
            Self::Action => "action",
            Self::EventName => "eventName",
            Self::Ref => "ref",
            Self::Workflow => "workflow",
            Self::Took => "took",
        }
    }

    /// Look up a field by identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::CATALOG.into_iter().find(|field| field.id() == id)
    }

    /// Render this field's value from run metadata.
    #[must_use]
    pub fn value(self, metadata: &RunMetadata) -> String {
        match self {
            Self::Repo => link(&metadata.repo_url(), &metadata.repository),
            Self::Message => link(&metadata.commit_html_url, metadata.commit_title()),
            Self::Commit => link(&metadata.commit_url(), metadata.short_sha()),
            Self::Author => metadata.author(),
            Self::Job => link(&metadata.job_url, &metadata.job_name),
            Self::Action => link(&metadata.pr_checks_url(), "action"),
            Self::EventName => metadata.event_name.clone(),
            Self::Ref => metadata.git_ref.clone(),
            Self::Workflow => link(&metadata.pr_checks_url(), &metadata.workflow),
            Self::Took => metadata.took.clone(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Expand a `fields` input into catalog entries.
///
/// Order and duplicates are preserved, `all` expands to the full catalog in
/// place and unknown identifiers are dropped.
#[must_use]
pub fn expand_fields(list: &str) -> Vec<Field> {
    let mut fields = Vec::new();
    for id in csv::split(list) {
        if id == "all" {
            fields.extend(Field::CATALOG);
        } else if let Some(field) = Field::from_id(id) {
            fields.push(field);
        }
    }
    fields
}
