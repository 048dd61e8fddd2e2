//! Decision engine
//!
//! Each cycle turns a freshly fetched batch of PRs into at most one action:
//! 1. Fetch - list or search candidates, hydrate them (effectful, swallowing per-PR failures)
//! 2. Evaluate - label, review and restriction gates per PR
//! 3. Select - merge pass over the whole batch, then update pass
//!
//! The engine never writes; the chosen action is carried out by
//! [`crate::execute`].

mod eligibility;
mod fetch;
mod labels;
mod restrictions;
mod reviews;
mod select;

pub use eligibility::{
    is_mergeable_by_labels_and_reviews, should_merge, should_skip, should_skip_summary,
    should_update,
};
pub use fetch::{decide, fetch_pulls, hydrate_pulls};
pub use labels::{is_mergeable_by_labels, pull_labels};
pub use restrictions::{get_restrictions, is_user_allowed_to_merge, is_user_in_team};
pub use reviews::{changes_requested_superseded, is_mergeable_by_reviews};
pub use select::{decide_for_pull, decide_with_results};

use crate::types::PullRequest;
use serde::Deserialize;

/// How candidate PRs are retrieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullsMode {
    /// All open PRs of the repository
    #[default]
    List,
    /// PRs matched by an issue search query
    Search,
}

impl PullsMode {
    /// Search when a query is configured, list otherwise
    pub const fn infer(query: Option<&str>) -> Self {
        if query.is_some() {
            Self::Search
        } else {
            Self::List
        }
    }
}

/// What a failed (non-404) restriction or membership lookup means
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupFailurePolicy {
    /// Restriction failure: branch unrestricted. Membership failure: not a member.
    #[default]
    Lenient,
    /// Abort the cycle with [`crate::error::Error::LookupFailed`]
    Strict,
}

/// Inputs to a decision cycle
#[derive(Debug, Clone, Default)]
pub struct DecideOptions {
    /// How candidates are retrieved
    pub pulls_mode: PullsMode,
    /// Search query (search mode only)
    pub query: Option<String>,
    /// Labels every candidate must carry
    pub labels: Vec<String>,
    /// Labels no candidate may carry
    pub not_labels: Vec<String>,
    /// Policy for failed restriction/membership lookups
    pub on_lookup_error: LookupFailurePolicy,
}

/// Action chosen for a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Merge the PR into its base
    Merge,
    /// Merge the base into the PR's head branch
    Update,
    /// Do nothing this cycle
    Wait,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Update => write!(f, "update"),
            Self::Wait => write!(f, "wait"),
        }
    }
}

/// Output of one decision cycle
#[derive(Debug, Clone)]
pub struct Decision {
    /// What to do
    pub action: Action,
    /// The PR to act on (`None` when waiting on an empty batch)
    pub result: Option<PullRequest>,
    /// Every PR evaluated this cycle, sorted by number
    pub results: Vec<PullRequest>,
}

impl Decision {
    /// A wait decision with no chosen PR
    pub const fn wait(results: Vec<PullRequest>) -> Self {
        Self {
            action: Action::Wait,
            result: None,
            results,
        }
    }

    /// Number of the chosen PR, if any
    pub fn pr_number(&self) -> Option<u64> {
        self.result.as_ref().map(|pull| pull.number)
    }
}
