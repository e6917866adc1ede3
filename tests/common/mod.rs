//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::MockPlatformService;

use quorum_merge::config::MonitorConfig;
use quorum_merge::types::{PlatformConfig, PullRequestRef};
use std::time::Duration;

/// Seconds between poll cycles in monitor tests
pub const POLL_SECS: u64 = 5;

/// Config for a mock GitHub repository
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        api_url: None,
    }
}

/// A mock with the GitHub test config
pub fn mock() -> MockPlatformService {
    MockPlatformService::with_config(github_config())
}

/// PR #42 by octocat targeting `base`
pub fn make_pr(base: &str) -> PullRequestRef {
    PullRequestRef {
        number: 42,
        base_ref: base.to_string(),
        author: "octocat".to_string(),
    }
}

/// Monitor config targeting `master` with a 5s interval and `timeout_secs` budget
pub fn monitor_config(timeout_secs: u64) -> MonitorConfig {
    MonitorConfig::new(
        Duration::from_secs(POLL_SECS),
        Duration::from_secs(timeout_secs),
        "master",
    )
    .expect("valid test config")
}

/// Minimal `pull_request` event payload
pub fn pull_request_event(number: u64, base: &str, author: &str) -> String {
    serde_json::json!({
        "action": "opened",
        "number": number,
        "pull_request": {
            "number": number,
            "base": { "ref": base },
            "user": { "login": author }
        }
    })
    .to_string()
}
