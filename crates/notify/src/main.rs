//! CLI for posting a workflow run notification to Slack
//!
//! Run `run-notify --help` for usage information. Every option can also be
//! supplied through the matching GitHub Actions `INPUT_*` variable.

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use run_notify::{CiContext, Client, ClientConfig, GitHubMetadata, Message, Status};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "run-notify")]
#[command(about = "Post a Slack notification summarizing a workflow run")]
#[command(version)]
struct Cli {
    /// Run outcome: success, failure, cancelled or custom
    #[arg(long, env = "INPUT_STATUS", default_value = "")]
    status: String,

    /// Fields to attach (comma-separated, or `all`)
    #[arg(long, env = "INPUT_FIELDS", default_value = "")]
    fields: String,

    /// Message text; defaults to a line describing the outcome
    #[arg(long, env = "INPUT_TEXT", default_value = "")]
    text: String,

    /// Users or groups to mention (comma-separated)
    #[arg(long, env = "INPUT_MENTION", default_value = "")]
    mention: String,

    /// Outcomes that trigger mentions (comma-separated, or `always`)
    #[arg(long, env = "INPUT_IF_MENTION", default_value = "")]
    if_mention: String,

    #[arg(long, env = "INPUT_AUTHOR_NAME", default_value = "")]
    author_name: String,

    #[arg(long, env = "INPUT_USERNAME", default_value = "")]
    username: String,

    #[arg(long, env = "INPUT_ICON_EMOJI", default_value = "")]
    icon_emoji: String,

    #[arg(long, env = "INPUT_ICON_URL", default_value = "")]
    icon_url: String,

    #[arg(long, env = "INPUT_CHANNEL", default_value = "")]
    channel: String,

    /// Template used when status is `custom`
    #[arg(long, env = "INPUT_CUSTOM_PAYLOAD", default_value = "")]
    custom_payload: String,

    /// Job to report; defaults to GITHUB_JOB
    #[arg(long, env = "INPUT_JOB_NAME")]
    job_name: Option<String>,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Token used to look up commit and job details
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Print the JSON body instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Client inputs, trimmed the way the Actions runner passes them.
    fn config(&self) -> ClientConfig {
        let input = |value: &str| value.trim().to_string();
        ClientConfig {
            status: input(&self.status),
            fields: input(&self.fields),
            mention: input(&self.mention),
            if_mention: input(&self.if_mention),
            author_name: input(&self.author_name),
            username: input(&self.username),
            icon_emoji: input(&self.icon_emoji),
            icon_url: input(&self.icon_url),
            channel: input(&self.channel),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let context = CiContext::from_env();
    let metadata = GitHubMetadata::new(context, cli.github_token.clone(), cli.job_name.clone())?;

    // Dry runs never post
    let webhook_url = if cli.dry_run {
        cli.webhook_url.clone().or_else(|| Some("http://localhost".to_string()))
    } else {
        cli.webhook_url.clone()
    };

    let client = Client::new(&cli.config(), Arc::new(metadata), webhook_url)?;

    let message: Message = match client.status() {
        Status::Custom => client
            .custom(&cli.custom_payload)
            .await
            .context("Failed to render custom payload")?
            .into(),
        Status::Outcome(_) => client.prepare(&cli.text).await?.into(),
        Status::Unset => {
            anyhow::bail!("status is required (success, failure, cancelled or custom)")
        }
    };

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&message.to_json()?)?);
        return Ok(());
    }

    client
        .send(message)
        .await
        .context("Failed to deliver notification")?;

    info!("Notification sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use run_notify::{RunMetadata, UNAVAILABLE};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_from_args() {
        let cli = Cli::parse_from([
            "run-notify",
            "--status",
            "failure",
            "--fields",
            "repo,took",
            "--mention",
            "here",
            "--if-mention",
            "failure",
        ]);
        let config = cli.config();
        assert_eq!(config.status, "failure");
        assert_eq!(config.fields, "repo,took");
        assert_eq!(config.mention, "here");
        assert_eq!(config.if_mention, "failure");
    }

    #[test]
    fn test_config_inputs_are_trimmed() {
        let cli = Cli::parse_from([
            "run-notify",
            "--status",
            " failure ",
            "--mention",
            "here\n",
            "--channel",
            "  ",
        ]);
        let config = cli.config();
        assert_eq!(config.status, "failure");
        assert_eq!(config.mention, "here");
        assert_eq!(config.channel, "");
        assert_eq!(config.fields, "");
    }

    #[tokio::test]
    async fn test_dry_run_body_without_token() {
        let metadata = RunMetadata {
            took: UNAVAILABLE.to_string(),
            ..RunMetadata::default()
        };
        let config = ClientConfig {
            status: "success".to_string(),
            fields: "took".to_string(),
            ..ClientConfig::default()
        };
        let client = Client::new(&config, Arc::new(metadata), Some("http://localhost".into())).unwrap();
        let body = Message::from(client.prepare("").await.unwrap()).to_json().unwrap();
        assert_eq!(body["attachments"][0]["fields"][0]["value"], UNAVAILABLE);
    }
}
