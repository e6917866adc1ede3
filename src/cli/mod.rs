//! Command line interface
//!
//! Every option falls back to the environment variable a CI workflow sets.

mod context;
mod run;

pub use run::{report_outcome, run};

use clap::Parser;
use quorum_merge::config::{
    DEFAULT_BASE_BRANCH, DEFAULT_LABEL_COLOR, DEFAULT_LABEL_NAME, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_TIMEOUT_MINUTES,
};
use std::path::PathBuf;

/// Merge a pull request once a majority of its requested reviewers approve
#[derive(Parser, Debug)]
#[command(name = "quorum-merge", version, about, long_about = None)]
pub struct Cli {
    /// Seconds to sleep between poll cycles
    #[arg(long, env = "SLEEP_DURATION", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: u64,

    /// Minutes to wait for reviewers and approvals before giving up
    #[arg(long, env = "TIMEOUT_MINUTES", default_value_t = DEFAULT_TIMEOUT_MINUTES)]
    pub timeout_minutes: u64,

    /// Only PRs targeting this branch are merged
    #[arg(long, env = "BASE_BRANCH", default_value = DEFAULT_BASE_BRANCH)]
    pub base_branch: String,

    /// Path to the triggering event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Repository in owner/repo form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// GitHub token; falls back to GITHUB_TOKEN, then `gh auth token`
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Label applied to merged PRs
    #[arg(long, env = "AUTO_MERGE_LABEL", default_value = DEFAULT_LABEL_NAME)]
    pub label: String,

    /// Hex color of the label when it has to be created
    #[arg(long, env = "AUTO_MERGE_LABEL_COLOR", default_value = DEFAULT_LABEL_COLOR)]
    pub label_color: String,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}
