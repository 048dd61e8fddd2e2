//! Core types for mergerine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl PrState {
    /// Closed covers both "closed" and "merged"
    pub const fn is_closed(self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Host-computed composite merge status of a PR
///
/// Only `Clean` and `Behind` are acted upon; every other state causes the PR
/// to be skipped for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    /// No conflicts and all requirements met
    Clean,
    /// Head branch is behind base and needs updating
    Behind,
    /// Merge conflicts
    Dirty,
    /// Blocked by branch protection
    Blocked,
    /// Not yet computed by the host
    Unknown,
    /// PR is a draft
    Draft,
    /// Mergeable with failing non-required checks
    Unstable,
    /// Mergeable, pre-receive hooks pending
    HasHooks,
    /// Any state this crate does not know about
    #[serde(other)]
    Other,
}

impl MergeableState {
    /// Whether this state can ever lead to an action
    pub const fn is_relevant(self) -> bool {
        matches!(self, Self::Clean | Self::Behind)
    }
}

impl std::fmt::Display for MergeableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clean => "clean",
            Self::Behind => "behind",
            Self::Dirty => "dirty",
            Self::Blocked => "blocked",
            Self::Unknown => "unknown",
            Self::Draft => "draft",
            Self::Unstable => "unstable",
            Self::HasHooks => "has_hooks",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A pull request as returned by a list or search query
///
/// Summaries are cheap to fetch but do not carry a computed mergeable state,
/// so they must be hydrated into a [`PullRequest`] before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullSummary {
    /// PR number
    pub number: u64,
    /// Current state of the PR
    pub state: PrState,
    /// Mergeable state, when the listing endpoint reported one
    pub mergeable_state: Option<MergeableState>,
    /// Label names, when attached inline
    pub labels: Option<Vec<String>>,
}

/// Full PR record used by the decision engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Current state of the PR
    pub state: PrState,
    /// Host-computed mergeable state
    pub mergeable_state: MergeableState,
    /// Base branch name (merge target)
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Label names. `None` until attached from a summary or fetched lazily.
    pub labels: Option<Vec<String>>,
}

impl PullRequest {
    /// A PR is closed if it is not open, merged PRs included
    pub const fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Reviewer only commented
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review not yet submitted
    Pending,
    /// Any state this crate does not know about
    #[serde(other)]
    Other,
}

/// One reviewer's verdict on a PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer login
    pub login: String,
    /// Verdict
    pub state: ReviewState,
    /// Submission time, absent for pending reviews
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A team allowed to push to a protected branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Display name
    pub name: String,
    /// URL-safe team slug
    pub slug: String,
    /// Members URL template (`.../members{/member}`), if the host returned one
    pub members_url: Option<String>,
}

/// Branch protection restrictions on who may merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    /// Logins allowed directly
    pub users: Vec<String>,
    /// Teams whose members are allowed
    pub teams: Vec<Team>,
}

/// Result of a merge write
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Result of merging the base branch into the head branch
#[derive(Debug, Clone)]
pub struct UpdateResult {
    /// SHA of the new merge commit. `None` when the head was already up to date.
    pub sha: Option<String>,
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// API base URL (e.g. `https://api.github.com` or `https://ghe.example.com/api/v3`)
    pub base_url: String,
}
