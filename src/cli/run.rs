//! Run command - monitor the triggering PR until it can be merged

use crate::cli::Cli;
use crate::cli::context::RunContext;
use anstream::println;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use quorum_merge::monitor::run_monitor;
use quorum_merge::types::{MergeOrigin, PullRequestRef, RunOutcome};

/// Build the context and run the monitor to a terminal outcome
pub async fn run(cli: &Cli) -> Result<(PullRequestRef, RunOutcome)> {
    let ctx = RunContext::new(cli).await?;

    let outcome = run_monitor(ctx.platform.as_ref(), &ctx.pr, &ctx.config)
        .await
        .with_context(|| format!("auto-merge of PR #{} aborted", ctx.pr.number))?;

    Ok((ctx.pr, outcome))
}

/// Print a one-line summary of the outcome
pub fn report_outcome(pr: &PullRequestRef, outcome: &RunOutcome, base_branch: &str) {
    let number = pr.number;
    match outcome {
        RunOutcome::Merged(MergeOrigin::Quorum { approvers, sha }) => {
            let mentions: Vec<String> = approvers.iter().map(|a| format!("@{a}")).collect();
            println!(
                "{} PR #{number} merged with approval of {} ({})",
                "✅".green(),
                mentions.join(" "),
                sha.as_deref().unwrap_or("no sha").dimmed()
            );
        }
        RunOutcome::Merged(MergeOrigin::External) => {
            println!("{} PR #{number} is already merged", "✅".green());
        }
        RunOutcome::ClosedExternally => {
            println!("{} PR #{number} is closed, stopping", "🛑".red());
        }
        RunOutcome::TimedOut => {
            println!(
                "{} PR #{number} did not receive the required approvals within the timeout period",
                "⏳".yellow()
            );
        }
        RunOutcome::BranchMismatch => {
            println!(
                "{} PR does not target the '{base_branch}' branch, no merge action will be taken",
                "❌".yellow()
            );
        }
    }
}
