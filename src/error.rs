//! Error types for quorum-merge

use thiserror::Error;

/// Errors surfaced by configuration, event loading, auth and the gateway
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Triggering event payload is missing or malformed
    #[error("event payload error: {0}")]
    Event(String),

    /// No usable token, or the token was rejected
    #[error("authentication error: {0}")]
    Auth(String),

    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure (used by non-GitHub gateways and test doubles)
    #[error("platform error: {0}")]
    Platform(String),

    /// The merge endpoint answered but did not merge
    #[error("merge of PR #{pr_number} was rejected: {message}")]
    MergeRejected {
        /// PR that failed to merge
        pr_number: u64,
        /// Message returned by the platform
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invariant violated inside the crate
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
