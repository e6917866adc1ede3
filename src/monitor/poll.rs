//! Shared polling loop
//!
//! Both monitor phases poll the same way: check the PR is still open, give
//! up at the deadline, run the phase's cycle action, sleep, repeat.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{PrState, PullRequestRef};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Result of one cycle action
#[derive(Debug)]
pub enum CycleStatus<T> {
    /// The phase's condition is met
    Ready(T),
    /// Not yet; sleep and poll again
    Pending,
}

/// Why polling stopped without the condition being met
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStop {
    /// PR observed closed
    Closed,
    /// PR observed merged
    Merged,
    /// Deadline passed
    TimedOut,
}

/// Result of [`poll_until`]
#[derive(Debug)]
pub enum PollExit<T> {
    /// A cycle returned `Ready`
    Ready(T),
    /// Polling stopped early
    Stopped(PollStop),
}

/// Per-phase work done once per poll cycle
#[async_trait]
pub trait PollCycle: Send {
    /// Value produced when the phase's condition is met
    type Output: Send;

    /// Run one cycle against an open PR
    async fn run_cycle(
        &mut self,
        platform: &dyn PlatformService,
        pr: &PullRequestRef,
    ) -> Result<CycleStatus<Self::Output>>;
}

/// Interval and deadline shared by every phase of a run
#[derive(Debug, Clone, Copy)]
pub struct PollTiming {
    /// Sleep between cycles
    pub interval: Duration,
    /// Instant after which polling gives up
    pub deadline: Instant,
}

impl PollTiming {
    /// Deadline `timeout` from now.
    ///
    /// Fails with `Error::Config` when the deadline is past what the clock
    /// can represent.
    pub fn starting_now(interval: Duration, timeout: Duration) -> Result<Self> {
        let deadline = Instant::now().checked_add(timeout).ok_or_else(|| {
            Error::Config(format!("timeout of {}s is too large", timeout.as_secs()))
        })?;
        Ok(Self { interval, deadline })
    }

    /// Whether the deadline has passed
    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Poll until `cycle` is ready, the PR closes or merges, or the deadline passes.
///
/// Order within an iteration: state check, deadline check, cycle action, sleep.
/// The state check therefore always runs right after waking. Gateway errors end
/// polling immediately.
pub async fn poll_until<C: PollCycle>(
    platform: &dyn PlatformService,
    pr: &PullRequestRef,
    timing: PollTiming,
    cycle: &mut C,
) -> Result<PollExit<C::Output>> {
    loop {
        let state = platform.get_pr_state(pr.number).await?;
        debug!(pr_number = pr.number, %state, "current PR state");
        match state {
            PrState::Closed => return Ok(PollExit::Stopped(PollStop::Closed)),
            PrState::Merged => return Ok(PollExit::Stopped(PollStop::Merged)),
            PrState::Open => {}
        }

        if timing.expired() {
            return Ok(PollExit::Stopped(PollStop::TimedOut));
        }

        if let CycleStatus::Ready(value) = cycle.run_cycle(platform, pr).await? {
            return Ok(PollExit::Ready(value));
        }

        sleep(timing.interval).await;
    }
}
