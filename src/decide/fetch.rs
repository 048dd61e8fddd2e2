//! Batch orchestration: fetch, hydrate, then select

use super::eligibility::should_skip_summary;
use super::select::decide_with_results;
use super::{DecideOptions, Decision, PullsMode};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{PullRequest, PullSummary};
use tracing::{debug, info, warn};

/// Retrieve candidate summaries
///
/// List mode drops summaries that [`should_skip_summary`] rejects. Fetch
/// failures are logged and yield an empty batch.
pub async fn fetch_pulls(options: &DecideOptions, platform: &dyn PlatformService) -> Vec<PullSummary> {
    match options.pulls_mode {
        PullsMode::Search => {
            let Some(query) = options.query.as_deref() else {
                warn!("search mode without a query, nothing to fetch");
                return Vec::new();
            };
            match platform.search_pulls(query).await {
                Ok(pulls) => pulls,
                Err(e) => {
                    warn!(error = %e, query, "failed to search PRs");
                    Vec::new()
                }
            }
        }
        PullsMode::List => match platform.list_open_pulls().await {
            Ok(pulls) => {
                let total = pulls.len();
                let kept: Vec<PullSummary> = pulls
                    .into_iter()
                    .filter(|pull| !should_skip_summary(pull))
                    .collect();
                debug!(total, kept = kept.len(), "filtered listed PRs");
                kept
            }
            Err(e) => {
                warn!(error = %e, "failed to list PRs");
                Vec::new()
            }
        },
    }
}

/// Fetch the full record of each summary, in order
///
/// Labels are carried over from the summary. PRs that fail to load are
/// dropped from the batch.
pub async fn hydrate_pulls(
    summaries: Vec<PullSummary>,
    platform: &dyn PlatformService,
) -> Vec<PullRequest> {
    let mut pulls = Vec::with_capacity(summaries.len());

    for summary in summaries {
        match platform.get_pull(summary.number).await {
            Ok(mut pull) => {
                pull.labels = summary.labels;
                pulls.push(pull);
            }
            Err(e) => {
                warn!(pr_number = summary.number, error = %e, "failed to fetch PR, skipping");
            }
        }
    }

    pulls
}

/// Run one decision cycle against the platform
pub async fn decide(options: &DecideOptions, platform: &dyn PlatformService) -> Result<Decision> {
    let summaries = fetch_pulls(options, platform).await;
    if summaries.is_empty() {
        info!("no candidate PRs, waiting");
        return Ok(Decision::wait(Vec::new()));
    }

    let pulls = hydrate_pulls(summaries, platform).await;
    if pulls.is_empty() {
        info!("no candidate PRs could be loaded, waiting");
        return Ok(Decision::wait(Vec::new()));
    }

    decide_with_results(pulls, options, platform).await
}
