//! Authentication for GitHub
//!
//! Supports an explicit token, environment variables and the gh CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, test_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed explicitly (`--token` or `GH_TOKEN`)
    Explicit,
    /// Token from the `GITHUB_TOKEN` environment variable
    EnvVar,
    /// Token from `gh auth token`
    Cli,
}
