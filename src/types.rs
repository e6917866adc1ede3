//! Core types for quorum-merge

use serde::{Deserialize, Serialize};

/// The pull request a run is responsible for
///
/// Loaded once from the triggering event and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// PR number
    pub number: u64,
    /// Base branch name
    pub base_ref: String,
    /// Login of the PR author
    pub author: String,
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom API base URL (None for api.github.com)
    pub api_url: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo` slug
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open and can be merged
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// State of a single submitted review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the changes
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Review only carried comments
    Commented,
    /// An earlier review was dismissed
    Dismissed,
    /// Review started but not submitted
    Pending,
}

impl ReviewState {
    /// Whether this review replaces the reviewer's previous decision.
    ///
    /// Comment-only and pending reviews leave an earlier approval standing.
    pub const fn is_decision(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::ChangesRequested | Self::Dismissed
        )
    }
}

/// A review submitted on a PR, oldest first when listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Login of the reviewer
    pub login: String,
    /// Review state
    pub state: ReviewState,
}

/// Reviewers requested on the PR when it was first seen with at least one
///
/// Order is the order the platform reported them in; duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerSet {
    logins: Vec<String>,
}

impl ReviewerSet {
    /// Build a set from requested reviewer logins.
    ///
    /// Returns `None` when no reviewers are requested.
    pub fn from_requested<I>(logins: I) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for login in logins {
            if !unique.contains(&login) {
                unique.push(login);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self { logins: unique })
        }
    }

    /// Number of reviewers
    pub const fn len(&self) -> usize {
        self.logins.len()
    }

    /// Whether the set is empty; never true for a captured set
    pub const fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }

    /// Reviewer logins in capture order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.logins.iter().map(String::as_str)
    }

    /// Strict majority of the set: `floor(n / 2) + 1`
    pub const fn required_approvals(&self) -> usize {
        required_approvals(self.logins.len())
    }
}

/// Strict majority of `reviewers`
pub const fn required_approvals(reviewers: usize) -> usize {
    reviewers / 2 + 1
}

/// Approval status of every reviewer for one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalSnapshot {
    entries: Vec<(String, bool)>,
}

impl ApprovalSnapshot {
    /// Record a reviewer's status; call in `ReviewerSet` order
    pub fn record(&mut self, login: &str, approved: bool) {
        self.entries.push((login.to_string(), approved));
    }

    /// Number of approving reviewers
    pub fn approved_count(&self) -> usize {
        self.entries.iter().filter(|(_, approved)| *approved).count()
    }

    /// Approving reviewers in `ReviewerSet` order
    pub fn approvers(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, approved)| *approved)
            .map(|(login, _)| login.clone())
            .collect()
    }

    /// Approving reviewers as space separated `@login` mentions
    pub fn mentions(&self) -> String {
        self.approvers()
            .iter()
            .map(|login| format!("@{login}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether this snapshot meets `required` approvals
    pub fn meets(&self, required: usize) -> bool {
        self.approved_count() >= required
    }
}

/// Phase of a monitor run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for at least one reviewer to be requested
    WaitingForReviewers,
    /// Counting approvals every poll cycle
    PollingApprovals,
    /// PR merged, by this run or externally
    Merged,
    /// PR closed without merging
    ClosedExternally,
    /// Deadline passed before a terminal condition
    TimedOut,
    /// PR does not target the configured base branch
    BranchMismatch,
}

impl RunState {
    const fn rank(self) -> u8 {
        match self {
            Self::WaitingForReviewers => 0,
            Self::PollingApprovals => 1,
            Self::Merged | Self::ClosedExternally | Self::TimedOut | Self::BranchMismatch => 2,
        }
    }

    /// Whether no further transition is possible
    pub const fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Transitions only move forward and never leave a terminal state
    pub const fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForReviewers => write!(f, "waiting-for-reviewers"),
            Self::PollingApprovals => write!(f, "polling-approvals"),
            Self::Merged => write!(f, "merged"),
            Self::ClosedExternally => write!(f, "closed-externally"),
            Self::TimedOut => write!(f, "timed-out"),
            Self::BranchMismatch => write!(f, "branch-mismatch"),
        }
    }
}

/// How a merged run got there
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOrigin {
    /// This run reached quorum and merged
    Quorum {
        /// Approving reviewers at the time of merge
        approvers: Vec<String>,
        /// Merge commit SHA, when the platform returned one
        sha: Option<String>,
    },
    /// The PR was already merged when observed
    External,
}

/// Terminal result of a monitor run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The PR is merged
    Merged(MergeOrigin),
    /// The PR was closed without merging
    ClosedExternally,
    /// Neither quorum nor closure happened before the deadline
    TimedOut,
    /// The PR targets a branch outside the auto-merge scope
    BranchMismatch,
}

impl RunOutcome {
    /// The terminal `RunState` this outcome corresponds to
    pub const fn state(&self) -> RunState {
        match self {
            Self::Merged(_) => RunState::Merged,
            Self::ClosedExternally => RunState::ClosedExternally,
            Self::TimedOut => RunState::TimedOut,
            Self::BranchMismatch => RunState::BranchMismatch,
        }
    }
}

/// A label to create and apply after merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpec {
    /// Label name
    pub name: String,
    /// Hex color without leading `#`
    pub color: String,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Create a merge commit
    Merge,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Parameters of a merge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Merge method
    pub method: MergeMethod,
    /// Merge with administrator privileges, bypassing branch protection
    pub admin_override: bool,
    /// Commit message body
    pub body: String,
}

impl MergeRequest {
    /// Merge-commit strategy with admin override, as used on quorum
    pub fn admin_merge(body: impl Into<String>) -> Self {
        Self {
            method: MergeMethod::Merge,
            admin_override: true,
            body: body.into(),
        }
    }
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}
