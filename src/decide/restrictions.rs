//! Restriction resolver: who may merge into a protected branch

use super::{DecideOptions, LookupFailurePolicy};
use crate::error::{Error, Result};
use crate::platform::{Lookup, PlatformService};
use crate::types::{PullRequest, Restrictions, Team};
use tracing::{debug, warn};

/// Merge restrictions on the PR's base branch
///
/// `Ok(None)` means anyone may merge. A 404 is never an error; other
/// failures follow `options.on_lookup_error`.
pub async fn get_restrictions(
    pull: &PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<Option<Restrictions>> {
    let pr_number = pull.number;
    match platform.get_restrictions(&pull.base_ref).await {
        Lookup::Found(restrictions) => {
            debug!(
                pr_number,
                base = %pull.base_ref,
                users = restrictions.users.len(),
                teams = restrictions.teams.len(),
                "base branch has merge restrictions"
            );
            Ok(Some(restrictions))
        }
        Lookup::NotFound => {
            debug!(pr_number, base = %pull.base_ref, "base branch has no merge restrictions");
            Ok(None)
        }
        Lookup::Failed(e) => match options.on_lookup_error {
            LookupFailurePolicy::Lenient => {
                warn!(pr_number, error = %e, "restriction lookup failed, treating branch as unrestricted");
                Ok(None)
            }
            LookupFailurePolicy::Strict => Err(Error::LookupFailed {
                what: "restrictions",
                pr_number,
                message: e.to_string(),
            }),
        },
    }
}

/// Whether `login` is a member of `team`
///
/// A 404 means "not a member"; other failures follow `options.on_lookup_error`.
pub async fn is_user_in_team(
    login: &str,
    team: &Team,
    pull: &PullRequest,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    let pr_number = pull.number;
    match platform.check_team_membership(login, team).await {
        Lookup::Found(is_member) => Ok(is_member),
        Lookup::NotFound => Ok(false),
        Lookup::Failed(e) => match options.on_lookup_error {
            LookupFailurePolicy::Lenient => {
                warn!(pr_number, login, team = %team.name, error = %e, "membership lookup failed, treating as non-member");
                Ok(false)
            }
            LookupFailurePolicy::Strict => Err(Error::LookupFailed {
                what: "team membership",
                pr_number,
                message: e.to_string(),
            }),
        },
    }
}

/// Whether `login` may merge `pull` under `restrictions`
///
/// Direct user grants are checked first, then teams in order, stopping at
/// the first team that contains the user.
pub async fn is_user_allowed_to_merge(
    login: &str,
    pull: &PullRequest,
    restrictions: Option<&Restrictions>,
    options: &DecideOptions,
    platform: &dyn PlatformService,
) -> Result<bool> {
    let pr_number = pull.number;
    let Some(restrictions) = restrictions else {
        debug!(pr_number, login, "no restrictions, user allowed");
        return Ok(true);
    };

    if restrictions.users.iter().any(|user| user == login) {
        debug!(pr_number, login, "user allowed directly");
        return Ok(true);
    }

    for team in &restrictions.teams {
        if is_user_in_team(login, team, pull, options, platform).await? {
            debug!(pr_number, login, team = %team.name, "user allowed through team");
            return Ok(true);
        }
    }

    debug!(pr_number, login, "user not in allowed users or teams");
    Ok(false)
}
