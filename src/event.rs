//! Triggering event payload
//!
//! GitHub Actions writes the webhook payload that started the workflow to
//! `GITHUB_EVENT_PATH`. `pull_request` events carry the number at the top
//! level; `pull_request_review` events only inside `pull_request`.

use crate::error::{Error, Result};
use crate::types::PullRequestRef;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct EventPayload {
    number: Option<u64>,
    pull_request: Option<EventPullRequest>,
}

#[derive(Deserialize)]
struct EventPullRequest {
    number: Option<u64>,
    base: EventBase,
    user: EventUser,
}

#[derive(Deserialize)]
struct EventBase {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Deserialize)]
struct EventUser {
    login: String,
}

/// Parse a pull request reference out of an event payload
pub fn parse_event(json: &str) -> Result<PullRequestRef> {
    let payload: EventPayload = serde_json::from_str(json)
        .map_err(|e| Error::Event(format!("failed to parse event payload: {e}")))?;

    let pr = payload
        .pull_request
        .ok_or_else(|| Error::Event("payload has no 'pull_request' object".to_string()))?;

    let number = payload
        .number
        .or(pr.number)
        .ok_or_else(|| Error::Event("payload has no pull request number".to_string()))?;

    if pr.base.ref_field.is_empty() {
        return Err(Error::Event("pull request base ref is empty".to_string()));
    }
    if pr.user.login.is_empty() {
        return Err(Error::Event("pull request author login is empty".to_string()));
    }

    Ok(PullRequestRef {
        number,
        base_ref: pr.base.ref_field,
        author: pr.user.login,
    })
}

/// Load and parse the event payload at `path`
pub fn load_event(path: &Path) -> Result<PullRequestRef> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Event(format!("failed to read {}: {e}", path.display())))?;
    parse_event(&content)
}
