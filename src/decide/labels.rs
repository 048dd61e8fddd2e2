//! Label gate

use super::DecideOptions;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::debug;

/// Labels of `pull`, fetched and cached on the record on first access
pub async fn pull_labels<'a>(
    pull: &'a mut PullRequest,
    platform: &dyn PlatformService,
) -> Result<&'a [String]> {
    let labels = match pull.labels.take() {
        Some(labels) => labels,
        None => platform.list_labels(pull.number).await?,
    };
    let labels: &[String] = pull.labels.insert(labels);
    Ok(labels)
}

/// Whether `pull` carries every required label and none of the forbidden ones
///
/// Passes without fetching anything when no label rules are configured.
pub async fn is_mergeable_by_labels(
    pull: &mut PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    if options.labels.is_empty() && options.not_labels.is_empty() {
        return Ok(true);
    }

    let pr_number = pull.number;
    let labels = pull_labels(pull, platform).await?;
    debug!(pr_number, ?labels, required = ?options.labels, forbidden = ?options.not_labels, "checking labels");

    if let Some(missing) = options.labels.iter().find(|&l| !labels.contains(l)) {
        debug!(pr_number, label = %missing, "missing required label");
        return Ok(false);
    }
    if let Some(present) = options.not_labels.iter().find(|&l| labels.contains(l)) {
        debug!(pr_number, label = %present, "has forbidden label");
        return Ok(false);
    }
    Ok(true)
}
