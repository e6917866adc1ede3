//! GitHub token discovery and verification

use super::AuthSource;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use tokio::process::Command;
use tracing::debug;

/// Environment variable GitHub Actions exposes the workflow token in
const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// A usable GitHub token and where it came from
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// Access token
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Find a GitHub token.
///
/// Tries `explicit`, then `GITHUB_TOKEN`, then `gh auth token`.
pub async fn get_github_auth(explicit: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = non_empty(explicit.map(ToString::to_string)) {
        debug!("using explicit GitHub token");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Explicit,
        });
    }

    if let Some(token) = non_empty(std::env::var(GITHUB_TOKEN_ENV).ok()) {
        debug!("using GitHub token from {GITHUB_TOKEN_ENV}");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        });
    }

    debug!("trying gh auth token");
    let output = Command::new("gh").args(["auth", "token"]).output().await;
    if let Ok(output) = output
        && output.status.success()
        && let Some(token) = non_empty(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found; set GH_TOKEN or GITHUB_TOKEN, or run 'gh auth login'".to_string(),
    ))
}

/// Verify the service's token works, returning the authenticated login
pub async fn test_github_auth(platform: &dyn PlatformService) -> Result<String> {
    platform
        .authenticated_user()
        .await
        .map_err(|e| Error::Auth(format!("token was rejected: {e}")))
}
