//! Run metadata consumed by the payload builder and the template renderer.

use async_trait::async_trait;
use chrono::Duration;

/// Value used for any metadata that could not be fetched.
pub const UNAVAILABLE: &str = "GitHub Token is not set.";

/// Everything known about the run being reported.
///
/// Values that could not be resolved hold [`UNAVAILABLE`] and URLs that could
/// not be resolved are empty, so consumers never deal with missing data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunMetadata {
    /// Repository slug, `owner/repo`
    pub repository: String,
    /// Web base URL, e.g. `https://github.com`
    pub server_url: String,
    /// Full commit SHA
    pub sha: String,
    /// Full commit message
    pub commit_message: String,
    /// Commit page as reported by the API
    pub commit_html_url: String,
    pub author_name: String,
    pub author_email: String,
    pub job_name: String,
    pub job_url: String,
    pub workflow: String,
    pub run_id: String,
    pub event_name: String,
    pub git_ref: String,
    /// Elapsed time of the job, e.g. `1 hour 1 min 1 sec`
    pub took: String,
}

impl RunMetadata {
    /// First 8 characters of the commit SHA.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    /// First line of the commit message.
    #[must_use]
    pub fn commit_title(&self) -> &str {
        self.commit_message.lines().next().unwrap_or_default()
    }

    #[must_use]
    pub fn repo_url(&self) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), self.repository)
    }

    #[must_use]
    pub fn commit_url(&self) -> String {
        format!("{}/commit/{}", self.repo_url(), self.sha)
    }

    #[must_use]
    pub fn pr_checks_url(&self) -> String {
        format!("{}/checks", self.commit_url())
    }

    #[must_use]
    pub fn run_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repo_url(), self.run_id)
    }

    /// Author identity, `name<email>`.
    #[must_use]
    pub fn author(&self) -> String {
        if self.author_email.is_empty() {
            self.author_name.clone()
        } else {
            format!("{}<{}>", self.author_name, self.author_email)
        }
    }
}

/// Format a Slack link, falling back to the bare label when there is no URL.
#[must_use]
pub fn link(url: &str, label: &str) -> String {
    if url.is_empty() {
        label.to_string()
    } else {
        format!("<{url}|{label}>")
    }
}

/// Format an elapsed duration as `1 hour 1 min 1 sec`, omitting leading zero units.
#[must_use]
pub fn format_took(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{hours} hour {mins} min {secs} sec")
    } else if mins > 0 {
        format!("{mins} min {secs} sec")
    } else {
        format!("{secs} sec")
    }
}

/// Source of run metadata (GitHub API, fixtures, etc.).
///
/// Implementations degrade to [`UNAVAILABLE`] values instead of failing.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Resolve the metadata of the current run.
    async fn fetch(&self) -> RunMetadata;
}

/// Already-resolved metadata serves itself.
#[async_trait]
impl MetadataSource for RunMetadata {
    async fn fetch(&self) -> RunMetadata {
        self.clone()
    }
}
