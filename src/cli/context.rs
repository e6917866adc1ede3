//! Run context built from the command line
//!
//! Everything here can fail before the first poll: configuration, the event
//! payload and authentication.

use crate::cli::Cli;
use anyhow::{Context, Result};
use quorum_merge::auth::{get_github_auth, test_github_auth};
use quorum_merge::config::MonitorConfig;
use quorum_merge::event::load_event;
use quorum_merge::platform::{GitHubService, PlatformService, parse_repository};
use quorum_merge::types::PullRequestRef;
use std::time::Duration;
use tracing::info;

/// Validated inputs for one monitor run
pub struct RunContext {
    /// Monitor settings
    pub config: MonitorConfig,
    /// PR from the triggering event
    pub pr: PullRequestRef,
    /// Authenticated platform service
    pub platform: Box<dyn PlatformService>,
}

/// Validate configuration from `cli` into a `MonitorConfig`
pub fn monitor_config(cli: &Cli) -> Result<MonitorConfig> {
    let timeout_secs = cli
        .timeout_minutes
        .checked_mul(60)
        .context("timeout is too large")?;
    let config = MonitorConfig::new(
        Duration::from_secs(cli.poll_interval),
        Duration::from_secs(timeout_secs),
        cli.base_branch.clone(),
    )?
    .with_label(cli.label.clone(), cli.label_color.clone())?;
    Ok(config)
}

impl RunContext {
    /// Build the context: config, event, then authenticated service
    pub async fn new(cli: &Cli) -> Result<Self> {
        let config = monitor_config(cli).context("invalid configuration")?;

        let platform_config = parse_repository(&cli.repository, cli.api_url.as_deref())
            .context("invalid repository")?;

        let pr = load_event(&cli.event_path).context("cannot load triggering event")?;

        let auth = get_github_auth(cli.token.as_deref()).await?;
        let platform = GitHubService::new(&auth.token, platform_config)?;
        let login = test_github_auth(&platform).await?;
        info!(
            login = %login,
            source = ?auth.source,
            repository = %platform.config().slug(),
            "authenticated with GitHub"
        );

        Ok(Self {
            config,
            pr,
            platform: Box::new(platform),
        })
    }
}
