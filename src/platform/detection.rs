//! Repository detection from CI environment values

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use url::Url;

const DEFAULT_API_HOST: &str = "api.github.com";

/// Build a `PlatformConfig` from an `owner/repo` slug and optional API URL.
///
/// `api_url` is the value of `GITHUB_API_URL`; the public github.com API is
/// normalized to `None`.
pub fn parse_repository(slug: &str, api_url: Option<&str>) -> Result<PlatformConfig> {
    let slug = slug.trim().trim_end_matches(".git");
    let (owner, repo) = slug
        .split_once('/')
        .ok_or_else(|| Error::Config(format!("repository '{slug}' is not in owner/repo form")))?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(Error::Config(format!(
            "repository '{slug}' is not in owner/repo form"
        )));
    }

    let api_url = match api_url.map(str::trim).filter(|u| !u.is_empty()) {
        None => None,
        Some(raw) => {
            let parsed = Url::parse(raw)
                .map_err(|e| Error::Config(format!("invalid API URL '{raw}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "API URL '{raw}' must use http or https"
                )));
            }
            if parsed.host_str() == Some(DEFAULT_API_HOST) {
                None
            } else {
                Some(raw.trim_end_matches('/').to_string())
            }
        }
    };

    Ok(PlatformConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        api_url,
    })
}
