//! Action execution - effectful operations
//!
//! Takes a [`Decision`] (created by the decision engine) and performs the
//! single write it calls for via the platform API. Write failures are
//! returned to the caller untouched; nothing is retried.
//!
//! [`run_until`] repeats cycles on an interval until told to stop.

use crate::decide::{Action, DecideOptions, Decision, decide};
use crate::error::Result;
use crate::platform::PlatformService;
use std::future::Future;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

/// Options for action execution
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Log the action without performing it
    pub dry: bool,
    /// Delete the head branch after a successful merge
    pub delete_branch_after_merge: bool,
}

/// What happened when a decision was executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Nothing to do
    Waited,
    /// Dry run; the action was only logged
    Skipped {
        /// Action that would have run
        action: Action,
        /// Target PR
        pr_number: u64,
    },
    /// Merge call returned
    Merged {
        /// Target PR
        pr_number: u64,
        /// Whether the host reported the PR as merged
        merged: bool,
        /// Merge commit SHA
        sha: Option<String>,
        /// Whether the head branch was deleted afterwards
        branch_deleted: bool,
    },
    /// Base branch merged into the head branch
    Updated {
        /// Target PR
        pr_number: u64,
        /// New merge commit, `None` if the head was already up to date
        sha: Option<String>,
    },
}

/// Execute a decision (EFFECTFUL)
///
/// Branch deletion after a merge is best-effort: a failure is logged and
/// reported as `branch_deleted: false`.
pub async fn execute_decision(
    decision: &Decision,
    platform: &dyn PlatformService,
    options: &ExecuteOptions,
) -> Result<ExecutionOutcome> {
    let Some(pull) = decision.result.as_ref().filter(|_| decision.action != Action::Wait) else {
        return Ok(ExecutionOutcome::Waited);
    };
    let pr_number = pull.number;

    if options.dry {
        info!(pr_number, action = %decision.action, "dry run, not executing");
        return Ok(ExecutionOutcome::Skipped {
            action: decision.action,
            pr_number,
        });
    }

    match decision.action {
        Action::Merge => {
            info!(pr_number, title = %pull.title, "merging PR");
            let result = platform.merge_pull(pull).await?;

            if !result.merged {
                warn!(pr_number, message = ?result.message, "merge call returned without merging");
            }

            let mut branch_deleted = false;
            if result.merged && options.delete_branch_after_merge {
                match platform.delete_branch(&pull.head_ref).await {
                    Ok(()) => {
                        info!(pr_number, branch = %pull.head_ref, "deleted head branch");
                        branch_deleted = true;
                    }
                    Err(e) => {
                        warn!(pr_number, branch = %pull.head_ref, error = %e, "failed to delete head branch");
                    }
                }
            }

            Ok(ExecutionOutcome::Merged {
                pr_number,
                merged: result.merged,
                sha: result.sha,
                branch_deleted,
            })
        }
        Action::Update => {
            info!(pr_number, base = %pull.base_ref, head = %pull.head_ref, "updating PR from base");
            let result = platform.update_pull(pull).await?;
            Ok(ExecutionOutcome::Updated {
                pr_number,
                sha: result.sha,
            })
        }
        Action::Wait => Ok(ExecutionOutcome::Waited),
    }
}

/// Run one full cycle: decide, then execute the decision
pub async fn run_cycle(
    decide_options: &DecideOptions,
    execute_options: &ExecuteOptions,
    platform: &dyn PlatformService,
) -> Result<ExecutionOutcome> {
    let decision = decide(decide_options, platform).await?;
    execute_decision(&decision, platform, execute_options).await
}

/// Run a cycle every `period` until `shutdown` resolves
///
/// Cycles never overlap; a missed tick is delayed rather than bursted. A
/// failed cycle is logged and the next tick proceeds. `shutdown` is polled
/// while a cycle is in flight, so a hung remote call cannot block it.
/// Returns the number of cycles that ran to completion.
pub async fn run_until<F>(
    decide_options: &DecideOptions,
    execute_options: &ExecuteOptions,
    platform: &dyn PlatformService,
    period: Duration,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    let repo = platform.config();
    info!(
        owner = %repo.owner,
        repo = %repo.repo,
        base_url = %repo.base_url,
        interval = ?period,
        dry = execute_options.dry,
        "starting poll loop"
    );

    tokio::pin!(shutdown);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut completed = 0;

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!(completed, "shutdown requested, stopping poll loop");
                return completed;
            }
            _ = ticker.tick() => {
                tokio::select! {
                    result = run_cycle(decide_options, execute_options, platform) => {
                        completed += 1;
                        match result {
                            Ok(outcome) => report(&outcome),
                            Err(e) => error!(error = %e, "cycle failed"),
                        }
                    }
                    () = &mut shutdown => {
                        warn!(completed, "shutdown requested mid-cycle, abandoning it");
                        return completed;
                    }
                }
            }
        }
    }
}

/// Log the result of one cycle
pub fn report(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Waited => info!("cycle complete: waiting"),
        ExecutionOutcome::Skipped { action, pr_number } => {
            info!(pr_number, %action, "cycle complete: dry run");
        }
        ExecutionOutcome::Merged {
            pr_number,
            merged,
            sha,
            branch_deleted,
        } => info!(pr_number, merged, sha = ?sha, branch_deleted, "cycle complete: merge"),
        ExecutionOutcome::Updated { pr_number, sha } => {
            info!(pr_number, sha = ?sha, "cycle complete: update");
        }
    }
}
