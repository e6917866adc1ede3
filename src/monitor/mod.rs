//! Approval monitor - the auto-merge state machine
//!
//! A run moves through three phases:
//! 1. Wait - poll until at least one reviewer is requested, nudging once
//! 2. Gate - stop if the PR does not target the configured base branch
//! 3. Count - poll approvals until a strict majority approves, then merge
//!
//! Closure, an external merge and the deadline end either polling phase.

mod execute;
mod poll;
mod quorum;

pub use execute::{execute_quorum_merge, merged_comment};
pub use poll::{CycleStatus, PollCycle, PollExit, PollStop, PollTiming, poll_until};
pub use quorum::latest_decision_is_approval;

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    ApprovalSnapshot, MergeOrigin, PullRequestRef, ReviewerSet, RunOutcome, RunState,
};
use async_trait::async_trait;
use tracing::{debug, info};

/// Comment asking the author to request reviewers
pub fn nudge_comment(author: &str) -> String {
    format!(
        "Hi @{author}, the pull request needs to be assigned to someone for review and approval. Please assign reviewers. Thank you!"
    )
}

/// Phase A cycle: wait for requested reviewers, nudging the author once
#[derive(Debug, Default)]
pub struct ReviewerAssignment {
    nudged: bool,
}

#[async_trait]
impl PollCycle for ReviewerAssignment {
    type Output = ReviewerSet;

    async fn run_cycle(
        &mut self,
        platform: &dyn PlatformService,
        pr: &PullRequestRef,
    ) -> Result<CycleStatus<ReviewerSet>> {
        let requested = platform.get_requested_reviewers(pr.number).await?;
        if let Some(reviewers) = ReviewerSet::from_requested(requested) {
            return Ok(CycleStatus::Ready(reviewers));
        }

        if !self.nudged {
            platform
                .create_pr_comment(pr.number, &nudge_comment(&pr.author))
                .await?;
            self.nudged = true;
            info!(pr_number = pr.number, author = %pr.author, "asked author to assign reviewers");
        }
        info!(pr_number = pr.number, "waiting for reviewers to be assigned");
        Ok(CycleStatus::Pending)
    }
}

/// Phase C cycle: re-read every reviewer's decision and test for quorum
#[derive(Debug)]
pub struct ApprovalQuorum {
    reviewers: ReviewerSet,
    required: usize,
}

impl ApprovalQuorum {
    /// Quorum over a captured reviewer set
    pub fn new(reviewers: ReviewerSet) -> Self {
        let required = reviewers.required_approvals();
        Self {
            reviewers,
            required,
        }
    }

    /// Approvals needed to merge
    pub const fn required(&self) -> usize {
        self.required
    }
}

#[async_trait]
impl PollCycle for ApprovalQuorum {
    type Output = ApprovalSnapshot;

    async fn run_cycle(
        &mut self,
        platform: &dyn PlatformService,
        pr: &PullRequestRef,
    ) -> Result<CycleStatus<ApprovalSnapshot>> {
        let snapshot = platform.review_snapshot(pr.number, &self.reviewers).await?;
        let approved = snapshot.approved_count();

        if snapshot.meets(self.required) {
            debug!(pr_number = pr.number, approved, required = self.required, "quorum reached");
            return Ok(CycleStatus::Ready(snapshot));
        }

        info!(
            pr_number = pr.number,
            approved,
            required = self.required,
            "PR does not have the required approvals yet"
        );
        Ok(CycleStatus::Pending)
    }
}

/// Drives one PR to a terminal outcome
///
/// Issues at most one merge and at most one nudge comment per run.
pub struct ApprovalMonitor<'a> {
    platform: &'a dyn PlatformService,
    config: &'a MonitorConfig,
    state: RunState,
}

impl<'a> ApprovalMonitor<'a> {
    /// Create a monitor in `WaitingForReviewers`
    pub const fn new(platform: &'a dyn PlatformService, config: &'a MonitorConfig) -> Self {
        Self {
            platform,
            config,
            state: RunState::WaitingForReviewers,
        }
    }

    /// Current phase
    pub const fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::Internal(format!(
                "invalid run state transition: {} -> {next}",
                self.state
            )));
        }
        debug!(from = %self.state, to = %next, "run state transition");
        self.state = next;
        Ok(())
    }

    fn stop(&mut self, pr: &PullRequestRef, stop: PollStop) -> Result<RunOutcome> {
        let outcome = match stop {
            PollStop::Closed => {
                info!(pr_number = pr.number, "PR is closed, stopping");
                RunOutcome::ClosedExternally
            }
            PollStop::Merged => {
                info!(pr_number = pr.number, "PR is already merged, nothing to do");
                RunOutcome::Merged(MergeOrigin::External)
            }
            PollStop::TimedOut => {
                info!(
                    pr_number = pr.number,
                    phase = %self.state,
                    "timeout reached, stopping"
                );
                RunOutcome::TimedOut
            }
        };
        self.transition(outcome.state())?;
        Ok(outcome)
    }

    /// Run the monitor for `pr` until a terminal outcome.
    ///
    /// The deadline is fixed when this is called. Any gateway error aborts the
    /// run and is returned as-is.
    pub async fn run(&mut self, pr: &PullRequestRef) -> Result<RunOutcome> {
        if self.state != RunState::WaitingForReviewers {
            return Err(Error::Internal(format!(
                "monitor already ran (state {})",
                self.state
            )));
        }

        let timing = PollTiming::starting_now(self.config.poll_interval, self.config.timeout)?;
        let wall_deadline = chrono::Duration::from_std(self.config.timeout)
            .ok()
            .and_then(|timeout| chrono::Utc::now().checked_add_signed(timeout));
        info!(
            pr_number = pr.number,
            base = %pr.base_ref,
            author = %pr.author,
            poll_interval_secs = self.config.poll_interval.as_secs(),
            deadline = ?wall_deadline,
            "monitoring PR for approvals"
        );

        let mut assignment = ReviewerAssignment::default();
        let reviewers = match poll_until(self.platform, pr, timing, &mut assignment).await? {
            PollExit::Ready(reviewers) => reviewers,
            PollExit::Stopped(stop) => return self.stop(pr, stop),
        };
        info!(
            pr_number = pr.number,
            reviewers = reviewers.len(),
            "reviewers assigned"
        );

        if pr.base_ref != self.config.target_base_branch {
            info!(
                pr_number = pr.number,
                base = %pr.base_ref,
                target = %self.config.target_base_branch,
                "PR does not target the auto-merge branch, no merge action will be taken"
            );
            self.transition(RunState::BranchMismatch)?;
            return Ok(RunOutcome::BranchMismatch);
        }

        self.transition(RunState::PollingApprovals)?;
        let mut quorum = ApprovalQuorum::new(reviewers);
        info!(
            pr_number = pr.number,
            required = quorum.required(),
            "polling approvals"
        );

        let snapshot = match poll_until(self.platform, pr, timing, &mut quorum).await? {
            PollExit::Ready(snapshot) => snapshot,
            PollExit::Stopped(stop) => return self.stop(pr, stop),
        };

        let origin = execute_quorum_merge(self.platform, pr, &snapshot, self.config).await?;
        self.transition(RunState::Merged)?;
        Ok(RunOutcome::Merged(origin))
    }
}

/// Run a fresh monitor for `pr`
pub async fn run_monitor(
    platform: &dyn PlatformService,
    pr: &PullRequestRef,
    config: &MonitorConfig,
) -> Result<RunOutcome> {
    ApprovalMonitor::new(platform, config).run(pr).await
}
