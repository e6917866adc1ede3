//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::monitor::latest_decision_is_approval;
use crate::platform::PlatformService;
use crate::types::{
    ApprovalSnapshot, LabelSpec, MergeMethod, MergeRequest, MergeResult, PlatformConfig, PrState,
    ReviewRecord, ReviewState, ReviewerSet,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref api_url) = config.api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn get_pr(&self, pr_number: u64) -> Result<octocrab::models::pulls::PullRequest> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;
        Ok(pr)
    }

    /// All reviews on a PR, oldest first
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<ReviewRecord>> {
        let first = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(pr_number)
            .send()
            .await?;
        let reviews = self.client.all_pages(first).await?;

        let records: Vec<ReviewRecord> = reviews
            .into_iter()
            .filter_map(|r| {
                let login = r.user?.login;
                let state = review_state_from_octocrab(r.state?)?;
                Some(ReviewRecord { login, state })
            })
            .collect();
        debug!(pr_number, count = records.len(), "listed PR reviews");
        Ok(records)
    }
}

fn review_state_from_octocrab(state: octocrab::models::pulls::ReviewState) -> Option<ReviewState> {
    use octocrab::models::pulls::ReviewState as Octo;
    match state {
        Octo::Approved => Some(ReviewState::Approved),
        Octo::ChangesRequested => Some(ReviewState::ChangesRequested),
        Octo::Commented => Some(ReviewState::Commented),
        Octo::Dismissed => Some(ReviewState::Dismissed),
        Octo::Pending => Some(ReviewState::Pending),
        // ReviewState is non-exhaustive; unknown states carry no decision
        _ => None,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn authenticated_user(&self) -> Result<String> {
        debug!("fetching authenticated user");
        let user = self.client.current().user().await?;
        debug!(login = %user.login, "authenticated");
        Ok(user.login)
    }

    async fn get_pr_state(&self, pr_number: u64) -> Result<PrState> {
        let pr = self.get_pr(pr_number).await?;

        let state = match pr.state {
            Some(octocrab::models::IssueState::Open) => PrState::Open,
            Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
            // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
            Some(_) | None => PrState::Closed,
        };

        debug!(pr_number, %state, "got PR state");
        Ok(state)
    }

    async fn get_requested_reviewers(&self, pr_number: u64) -> Result<Vec<String>> {
        let pr = self.get_pr(pr_number).await?;
        let reviewers: Vec<String> = pr
            .requested_reviewers
            .unwrap_or_default()
            .into_iter()
            .map(|user| user.login)
            .collect();
        debug!(pr_number, ?reviewers, "got requested reviewers");
        Ok(reviewers)
    }

    async fn is_reviewer_approved(&self, pr_number: u64, login: &str) -> Result<bool> {
        let reviews = self.list_reviews(pr_number).await?;
        Ok(latest_decision_is_approval(&reviews, login))
    }

    async fn review_snapshot(
        &self,
        pr_number: u64,
        reviewers: &ReviewerSet,
    ) -> Result<ApprovalSnapshot> {
        // One listing serves every reviewer of the cycle
        let reviews = self.list_reviews(pr_number).await?;
        let mut snapshot = ApprovalSnapshot::default();
        for login in reviewers.iter() {
            snapshot.record(login, latest_decision_is_approval(&reviews, login));
        }
        Ok(snapshot)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult> {
        // The REST merge endpoint applies the token's admin rights on its own;
        // the flag only documents intent here.
        debug!(
            pr_number,
            method = %request.method,
            admin_override = request.admin_override,
            repository = %self.config.slug(),
            "merging PR"
        );

        let octocrab_method = match request.method {
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .message(request.body.as_str())
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn ensure_label(&self, label: &LabelSpec) -> Result<()> {
        let issues = self.client.issues(&self.config.owner, &self.config.repo);

        if issues.get_label(&label.name).await.is_ok() {
            debug!(label = %label.name, "label already exists");
            return Ok(());
        }

        debug!(label = %label.name, color = %label.color, "creating label");
        issues
            .create_label(&label.name, &label.color, "")
            .await
            .map_err(|e| Error::GitHubApi(format!("failed to create label '{}': {e}", label.name)))?;
        Ok(())
    }

    async fn add_label(&self, pr_number: u64, name: &str) -> Result<()> {
        debug!(pr_number, label = name, "adding label");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, &[name.to_string()])
            .await?;
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
