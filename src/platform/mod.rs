//! Platform services for the hosting service
//!
//! Provides the narrow interface the approval monitor reads and writes PRs
//! through. All methods are plain I/O.

mod detection;
mod github;

pub use detection::parse_repository;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    ApprovalSnapshot, LabelSpec, MergeRequest, MergeResult, PlatformConfig, PrState, ReviewerSet,
};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// Every failure is returned as an error; callers decide which ones are fatal.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Login of the user the token belongs to.
    ///
    /// Doubles as the authentication check and must succeed before any
    /// other call is made.
    async fn authenticated_user(&self) -> Result<String>;

    /// Current state of a PR
    async fn get_pr_state(&self, pr_number: u64) -> Result<PrState>;

    /// Logins of users currently requested to review a PR
    async fn get_requested_reviewers(&self, pr_number: u64) -> Result<Vec<String>>;

    /// Whether the latest review decision of `login` on a PR is an approval
    async fn is_reviewer_approved(&self, pr_number: u64, login: &str) -> Result<bool>;

    /// Approval status of every reviewer in `reviewers`, taken within one cycle.
    ///
    /// The default queries [`is_reviewer_approved`] once per reviewer in order.
    /// Implementations may batch the reads.
    ///
    /// [`is_reviewer_approved`]: Self::is_reviewer_approved
    async fn review_snapshot(
        &self,
        pr_number: u64,
        reviewers: &ReviewerSet,
    ) -> Result<ApprovalSnapshot> {
        let mut snapshot = ApprovalSnapshot::default();
        for login in reviewers.iter() {
            let approved = self.is_reviewer_approved(pr_number, login).await?;
            snapshot.record(login, approved);
        }
        Ok(snapshot)
    }

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Merge a PR in the configured repository
    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult>;

    /// Make sure a label exists in the repository; an existing label is success
    async fn ensure_label(&self, label: &LabelSpec) -> Result<()>;

    /// Apply an existing label to a PR
    async fn add_label(&self, pr_number: u64, name: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
