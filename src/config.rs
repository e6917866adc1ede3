//! Monitor configuration
//!
//! Built once by the entry driver and passed by reference into the monitor.

use crate::error::{Error, Result};
use crate::types::LabelSpec;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Default seconds between poll cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default minutes before a run gives up
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 1440;

/// Default branch a PR must target to be auto-merged
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Default label applied after merging
pub const DEFAULT_LABEL_NAME: &str = "auto-merge";

/// Default color of the merge label
pub const DEFAULT_LABEL_COLOR: &str = "0e8a16";

/// Default merge commit body
pub const DEFAULT_MERGE_BODY: &str = "This PR was merged by the GitHub Actions bot.";

/// Immutable settings for one monitor run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Sleep between poll cycles
    pub poll_interval: Duration,
    /// Total time budget, measured from run start
    pub timeout: Duration,
    /// Branch a PR must target to be merged
    pub target_base_branch: String,
    /// Label created and applied after merging
    pub label: LabelSpec,
    /// Merge commit body
    pub merge_body: String,
}

impl MonitorConfig {
    /// Create a validated config with default label and merge body
    pub fn new(
        poll_interval: Duration,
        timeout: Duration,
        target_base_branch: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            poll_interval,
            timeout,
            target_base_branch: target_base_branch.into(),
            label: LabelSpec {
                name: DEFAULT_LABEL_NAME.to_string(),
                color: DEFAULT_LABEL_COLOR.to_string(),
            },
            merge_body: DEFAULT_MERGE_BODY.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the merge label
    pub fn with_label(mut self, name: impl Into<String>, color: impl Into<String>) -> Result<Self> {
        self.label = LabelSpec {
            name: name.into(),
            color: color.into().trim_start_matches('#').to_string(),
        };
        self.validate()?;
        Ok(self)
    }

    /// Replace the merge commit body
    #[must_use]
    pub fn with_merge_body(mut self, body: impl Into<String>) -> Self {
        self.merge_body = body.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll interval must be greater than zero".into()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }
        if Instant::now().checked_add(self.timeout).is_none() {
            return Err(Error::Config(format!(
                "timeout of {}s is too large",
                self.timeout.as_secs()
            )));
        }
        if self.target_base_branch.trim().is_empty() {
            return Err(Error::Config("base branch must not be empty".into()));
        }
        if self.label.name.trim().is_empty() {
            return Err(Error::Config("label name must not be empty".into()));
        }
        if self.label.color.len() != 6 || !self.label.color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Config(format!(
                "label color '{}' is not a 6-digit hex color",
                self.label.color
            )));
        }
        if self.poll_interval >= self.timeout {
            warn!(
                poll_interval_secs = self.poll_interval.as_secs(),
                timeout_secs = self.timeout.as_secs(),
                "poll interval is not shorter than the timeout; approvals will be checked once"
            );
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60),
            target_base_branch: DEFAULT_BASE_BRANCH.to_string(),
            label: LabelSpec {
                name: DEFAULT_LABEL_NAME.to_string(),
                color: DEFAULT_LABEL_COLOR.to_string(),
            },
            merge_body: DEFAULT_MERGE_BODY.to_string(),
        }
    }
}
