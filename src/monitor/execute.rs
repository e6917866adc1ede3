//! Merge action - effectful operations
//!
//! Runs once, after a poll cycle reached quorum. The merge itself is the
//! source of truth: only its failure aborts, labelling is best-effort.

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{ApprovalSnapshot, MergeOrigin, MergeRequest, PullRequestRef};
use tracing::{info, warn};

/// Comment posted after merging, crediting the approving reviewers
pub fn merged_comment(snapshot: &ApprovalSnapshot) -> String {
    format!(
        "💬 This Pull Request is auto-merged by approval of {} 🗨️",
        snapshot.mentions()
    )
}

/// Merge a PR that reached quorum, credit the approvers and label it
pub async fn execute_quorum_merge(
    platform: &dyn PlatformService,
    pr: &PullRequestRef,
    snapshot: &ApprovalSnapshot,
    config: &MonitorConfig,
) -> Result<MergeOrigin> {
    let pr_number = pr.number;
    let request = MergeRequest::admin_merge(config.merge_body.as_str());

    let result = platform.merge_pr(pr_number, &request).await?;
    if !result.merged {
        return Err(Error::MergeRejected {
            pr_number,
            message: result
                .message
                .unwrap_or_else(|| "no message returned".to_string()),
        });
    }
    info!(
        pr_number,
        sha = result.sha.as_deref().unwrap_or("(no sha)"),
        approvers = %snapshot.mentions(),
        "merged PR"
    );

    platform
        .create_pr_comment(pr_number, &merged_comment(snapshot))
        .await?;

    if let Err(e) = platform.ensure_label(&config.label).await {
        warn!(label = %config.label.name, error = %e, "failed to ensure label, continuing");
    }
    if let Err(e) = platform.add_label(pr_number, &config.label.name).await {
        warn!(pr_number, label = %config.label.name, error = %e, "failed to label merged PR");
    }

    Ok(MergeOrigin::Quorum {
        approvers: snapshot.approvers(),
        sha: result.sha,
    })
}
