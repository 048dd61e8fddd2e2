//! Candidate selection

use super::eligibility::{should_merge, should_update};
use super::{Action, DecideOptions, Decision};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::{debug, info};

/// Pick one PR and one action from a batch
///
/// The batch is sorted by number. Every PR is tried for merge before any is
/// tried for update, so a mergeable PR always wins over an updatable one
/// regardless of number.
pub async fn decide_with_results(
    mut batch: Vec<PullRequest>,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<Decision> {
    batch.sort_by_key(|pull| pull.number);

    let numbers: Vec<u64> = batch.iter().map(|pull| pull.number).collect();
    debug!(?numbers, "evaluating candidates");

    let mut chosen = None;

    for (index, pull) in batch.iter_mut().enumerate() {
        if should_merge(pull, options, platform).await? {
            chosen = Some((index, Action::Merge));
            break;
        }
    }

    // Nothing mergeable, look for one to update
    if chosen.is_none() {
        for (index, pull) in batch.iter_mut().enumerate() {
            if should_update(pull, options, platform).await? {
                chosen = Some((index, Action::Update));
                break;
            }
        }
    }

    let Some((index, action)) = chosen else {
        info!(candidates = batch.len(), "no PR ready, waiting");
        return Ok(Decision::wait(batch));
    };

    let result = batch[index].clone();
    info!(pr_number = result.number, %action, "decided");
    Ok(Decision {
        action,
        result: Some(result),
        results: batch,
    })
}

/// Decide for a single, already hydrated PR
///
/// Merge if possible, otherwise update, otherwise wait. The PR is always
/// attached to the decision.
pub async fn decide_for_pull(
    mut pull: PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<Decision> {
    let action = if should_merge(&mut pull, options, platform).await? {
        Action::Merge
    } else if should_update(&mut pull, options, platform).await? {
        Action::Update
    } else {
        Action::Wait
    };

    info!(pr_number = pull.number, %action, "decided for PR");
    Ok(Decision {
        action,
        result: Some(pull.clone()),
        results: vec![pull],
    })
}
