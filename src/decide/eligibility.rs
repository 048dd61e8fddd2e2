//! Eligibility evaluator: merge/update predicates per PR

use super::DecideOptions;
use super::labels::is_mergeable_by_labels;
use super::reviews::is_mergeable_by_reviews;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{MergeableState, PrState, PullRequest, PullSummary};
use tracing::debug;

/// Label gate, then review gate; stops at the first failure
pub async fn is_mergeable_by_labels_and_reviews(
    pull: &mut PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    let pr_number = pull.number;

    if !is_mergeable_by_labels(pull, options, platform).await? {
        debug!(pr_number, "not mergeable by labels");
        return Ok(false);
    }

    if !is_mergeable_by_reviews(pull, options, platform).await? {
        debug!(pr_number, "not mergeable by reviews");
        return Ok(false);
    }

    Ok(true)
}

/// Whether `pull` should be merged now
pub async fn should_merge(
    pull: &mut PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    should_act(pull, MergeableState::Clean, "merging", options, platform).await
}

/// Whether `pull` should be brought up to date with its base now
pub async fn should_update(
    pull: &mut PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    should_act(pull, MergeableState::Behind, "updating", options, platform).await
}

async fn should_act(
    pull: &mut PullRequest,
    wanted: MergeableState,
    verb: &str,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    let pr_number = pull.number;

    if pull.is_closed() {
        debug!(pr_number, "closed, not {verb}");
        return Ok(false);
    }

    if pull.mergeable_state != wanted {
        debug!(pr_number, mergeable_state = %pull.mergeable_state, "not {wanted}, not {verb}");
        return Ok(false);
    }

    is_mergeable_by_labels_and_reviews(pull, options, platform).await
}

const fn is_skippable(state: PrState, mergeable_state: Option<MergeableState>) -> bool {
    if state.is_closed() {
        return true;
    }
    match mergeable_state {
        Some(s) => !s.is_relevant(),
        None => false,
    }
}

/// Whether `pull` can be dropped without further evaluation
pub const fn should_skip(pull: &PullRequest) -> bool {
    is_skippable(pull.state, Some(pull.mergeable_state))
}

/// [`should_skip`] for a listed summary
///
/// Listings usually omit the mergeable state; such summaries are kept and
/// judged after hydration.
pub const fn should_skip_summary(summary: &PullSummary) -> bool {
    is_skippable(summary.state, summary.mergeable_state)
}
