//! Platform services for GitHub
//!
//! Everything the decision engine reads, and every write the executor issues,
//! goes through [`PlatformService`].

mod github;

pub use github::GitHubService;

use crate::error::{Error, Result};
use crate::types::{
    MergeResult, PlatformConfig, PullRequest, PullSummary, Restrictions, Review, Team,
    UpdateResult,
};
use async_trait::async_trait;

/// Outcome of a lookup where "not found" is a meaningful answer
///
/// Callers must decide per call site what `NotFound` and `Failed` mean;
/// nothing is collapsed here.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The resource exists
    Found(T),
    /// The host answered 404
    NotFound,
    /// Any other failure (transport, 5xx, bad payload)
    Failed(Error),
}

impl<T> Lookup<T> {
    /// Turn a fetch result into a lookup, treating every error as a failure
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Found(value),
            Err(e) => Self::Failed(e),
        }
    }
}

/// Platform service trait for PR operations
///
/// Implementations perform exactly one remote call per method; no retries
/// and no caching.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List open PRs of the configured repository
    async fn list_open_pulls(&self) -> Result<Vec<PullSummary>>;

    /// Run an issue search query and return the PRs it matched
    async fn search_pulls(&self, query: &str) -> Result<Vec<PullSummary>>;

    /// Fetch the full PR record, including the computed mergeable state
    ///
    /// The returned record has `labels: None`.
    async fn get_pull(&self, pr_number: u64) -> Result<PullRequest>;

    /// List label names on a PR
    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>>;

    /// List reviews on a PR in the order the host returns them
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>>;

    /// Fetch the push/merge restrictions on a protected branch
    ///
    /// `NotFound` means the branch has no restrictions.
    async fn get_restrictions(&self, branch: &str) -> Lookup<Restrictions>;

    /// Check whether `login` belongs to `team`
    ///
    /// `NotFound` means the user is not a member.
    async fn check_team_membership(&self, login: &str, team: &Team) -> Lookup<bool>;

    /// Merge a PR into its base branch
    async fn merge_pull(&self, pull: &PullRequest) -> Result<MergeResult>;

    /// Merge the PR's base branch into its head branch
    async fn update_pull(&self, pull: &PullRequest) -> Result<UpdateResult>;

    /// Delete a branch of the configured repository
    async fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
