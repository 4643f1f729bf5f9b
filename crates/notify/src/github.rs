//! Run metadata from GitHub Actions and the GitHub REST API.

use std::env;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metadata::{format_took, MetadataSource, RunMetadata, UNAVAILABLE};

const DEFAULT_SERVER_URL: &str = "https://github.com";
const DEFAULT_API_URL: &str = "https://api.github.com";
const JOBS_PER_PAGE: u32 = 100;

/// Run context exposed by the GitHub Actions runner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CiContext {
    pub repository: String,
    pub sha: String,
    pub run_id: String,
    pub workflow: String,
    pub job: String,
    pub event_name: String,
    pub git_ref: String,
    pub server_url: String,
    pub api_url: String,
}

impl CiContext {
    /// Load the context from `GITHUB_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();
        Self {
            repository: var("GITHUB_REPOSITORY"),
            sha: var("GITHUB_SHA"),
            run_id: var("GITHUB_RUN_ID"),
            workflow: var("GITHUB_WORKFLOW"),
            job: var("GITHUB_JOB"),
            event_name: var("GITHUB_EVENT_NAME"),
            git_ref: var("GITHUB_REF"),
            server_url: env::var("GITHUB_SERVER_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            api_url: env::var("GITHUB_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Metadata known without calling the API; everything else is unavailable.
    #[must_use]
    pub fn offline_metadata(&self) -> RunMetadata {
        RunMetadata {
            repository: self.repository.clone(),
            server_url: self.server_url.clone(),
            sha: self.sha.clone(),
            commit_message: UNAVAILABLE.to_string(),
            commit_html_url: String::new(),
            author_name: UNAVAILABLE.to_string(),
            author_email: String::new(),
            job_name: UNAVAILABLE.to_string(),
            job_url: String::new(),
            workflow: self.workflow.clone(),
            run_id: self.run_id.clone(),
            event_name: self.event_name.clone(),
            git_ref: self.git_ref.clone(),
            took: UNAVAILABLE.to_string(),
        }
    }
}

// =============================================================================
// GitHub API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CommitResponse {
    html_url: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct JobsResponse {
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct Job {
    name: String,
    #[serde(default)]
    html_url: Option<String>,
    started_at: DateTime<Utc>,
}

/// Metadata source backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubMetadata {
    client: reqwest::Client,
    context: CiContext,
    token: Option<String>,
    job_name: String,
}

impl GitHubMetadata {
    /// Create a metadata source for `context`.
    ///
    /// Without a token no request is made and API-backed values are
    /// unavailable. `job_name` selects the job to report, defaulting to the
    /// context's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(context: CiContext, token: Option<String>, job_name: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("run-notify/1.0"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        let job_name = job_name
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| context.job.clone());

        Ok(Self {
            client,
            context,
            token: token.filter(|s| !s.is_empty()),
            job_name,
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, token: &str, path: &str) -> Result<T> {
        let url = format!("{}/{path}", self.context.api_url.trim_end_matches('/'));
        debug!(url = %url, "Fetching run metadata");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("GitHub API error: {status} - {body}"));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {path}"))
    }

    async fn commit(&self, token: &str) -> Result<CommitResponse> {
        let CiContext { repository, sha, .. } = &self.context;
        self.get(token, &format!("repos/{repository}/commits/{sha}"))
            .await
    }

    async fn jobs(&self, token: &str) -> Result<Vec<Job>> {
        let CiContext {
            repository, run_id, ..
        } = &self.context;
        let response: JobsResponse = self
            .get(
                token,
                &format!("repos/{repository}/actions/runs/{run_id}/jobs?per_page={JOBS_PER_PAGE}"),
            )
            .await?;
        Ok(response.jobs)
    }
}

#[async_trait]
impl MetadataSource for GitHubMetadata {
    async fn fetch(&self) -> RunMetadata {
        let mut metadata = self.context.offline_metadata();
        let Some(token) = self.token.as_deref() else {
            debug!("GITHUB_TOKEN not set, run metadata unavailable");
            return metadata;
        };

        match self.commit(token).await {
            Ok(commit) => {
                metadata.commit_message = commit.commit.message;
                metadata.commit_html_url = commit.html_url;
                metadata.author_name = commit.commit.author.name;
                metadata.author_email = commit.commit.author.email;
            }
            Err(e) => warn!(error = %e, "Failed to fetch commit"),
        }

        match self.jobs(token).await {
            Ok(jobs) => match jobs.into_iter().find(|job| job.name == self.job_name) {
                Some(job) => {
                    metadata.took = format_took(Utc::now() - job.started_at);
                    metadata.job_name = job.name;
                    metadata.job_url = job.html_url.unwrap_or_default();
                }
                None => {
                    warn!(job = %self.job_name, "Job not found in workflow run");
                    metadata.job_name.clone_from(&self.job_name);
                    metadata.took = String::new();
                }
            },
            Err(e) => warn!(error = %e, "Failed to fetch jobs"),
        }

        metadata
    }
}
