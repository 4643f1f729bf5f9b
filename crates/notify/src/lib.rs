//! Slack notifications for CI workflow runs.
//!
//! This crate builds the notification describing how a GitHub Actions run
//! ended and posts it to a Slack incoming webhook.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use run_notify::{CiContext, Client, ClientConfig, GitHubMetadata};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig {
//!     status: "failure".to_string(),
//!     fields: "repo,commit,took".to_string(),
//!     mention: "here".to_string(),
//!     if_mention: "failure".to_string(),
//!     ..ClientConfig::default()
//! };
//! let metadata = GitHubMetadata::new(
//!     CiContext::from_env(),
//!     std::env::var("GITHUB_TOKEN").ok(),
//!     None,
//! )?;
//! let client = Client::new(
//!     &config,
//!     Arc::new(metadata),
//!     std::env::var("SLACK_WEBHOOK_URL").ok(),
//! )?;
//!
//! let payload = client.prepare("").await?;
//! client.send(payload).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`PayloadBuilder`] renders the fixed layout: summary line, outcome color
//!   and the requested [`Field`] blocks
//! - [`MentionResolver`] computes the mention prefix gated by [`MentionGate`]
//! - [`TemplateRenderer`] renders custom templates against a closed set of
//!   placeholders
//! - [`Client`] ties them together and delivers through a [`NotifyChannel`]
//! - [`MetadataSource`] supplies [`RunMetadata`]; [`GitHubMetadata`] reads it
//!   from the GitHub API

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod client;
pub mod config;
mod csv;
pub mod error;
pub mod fields;
pub mod github;
pub mod mention;
pub mod metadata;
pub mod payload;
pub mod status;
pub mod template;

pub use channels::slack::SlackChannel;
pub use channels::{Message, NotifyChannel};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{NotifyError, TemplateError};
pub use fields::{expand_fields, Field};
pub use github::{CiContext, GitHubMetadata};
pub use mention::{MentionResolver, MentionTarget};
pub use metadata::{MetadataSource, RunMetadata, UNAVAILABLE};
pub use payload::{Attachment, AttachmentField, Payload, PayloadBuilder};
pub use status::{MentionGate, Outcome, Status};
pub use template::{RenderedMessage, TemplateRenderer};
