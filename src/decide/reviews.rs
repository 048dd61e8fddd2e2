//! Review gate

use super::DecideOptions;
use super::restrictions::{get_restrictions, is_user_allowed_to_merge};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{PullRequest, Review, ReviewState};
use tracing::debug;

/// Whether every change request has been superseded
///
/// A change request is superseded by an approval from the same reviewer
/// submitted strictly later. Reviews without a timestamp neither supersede
/// nor get superseded.
pub fn changes_requested_superseded(reviews: &[Review]) -> bool {
    let approvals: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.state == ReviewState::Approved)
        .collect();

    reviews
        .iter()
        .filter(|r| r.state == ReviewState::ChangesRequested)
        .all(|change| {
            approvals.iter().any(|approval| {
                approval.login == change.login
                    && matches!(
                        (approval.submitted_at, change.submitted_at),
                        (Some(approved), Some(requested)) if approved > requested
                    )
            })
        })
}

/// Whether the review history of `pull` allows merging
///
/// Requires at least one approval and no outstanding change request. On a
/// restricted base branch at least one approver must also be allowed to
/// merge; approvals are tried in host order.
pub async fn is_mergeable_by_reviews(
    pull: &PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    let pr_number = pull.number;
    let reviews = platform.list_reviews(pr_number).await?;
    if reviews.is_empty() {
        debug!(pr_number, "no reviews");
        return Ok(false);
    }

    let approvals: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.state == ReviewState::Approved)
        .collect();
    if approvals.is_empty() {
        debug!(pr_number, "no approvals");
        return Ok(false);
    }

    if reviews.iter().any(|r| r.state == ReviewState::ChangesRequested) {
        if !changes_requested_superseded(&reviews) {
            debug!(pr_number, "changes requested without a later approval from the same reviewer");
            return Ok(false);
        }
        debug!(pr_number, "changes requested, superseded by later approvals");
    }

    let Some(restrictions) = get_restrictions(pull, options, platform).await? else {
        return Ok(true);
    };

    for approval in approvals {
        if is_user_allowed_to_merge(&approval.login, pull, Some(&restrictions), options, platform)
            .await?
        {
            return Ok(true);
        }
    }

    debug!(pr_number, "no approval from a user allowed to merge");
    Ok(false)
}
