//! Mock platform service for testing

use async_trait::async_trait;
use mergerine::error::{Error, Result};
use mergerine::platform::{Lookup, PlatformService};
use mergerine::types::{
    MergeResult, PlatformConfig, PullRequest, PullSummary, Restrictions, Review,
    Team, UpdateResult,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Cloneable stand-in for [`Lookup`] used to configure responses
#[derive(Debug, Clone)]
pub enum MockLookup<T> {
    /// Return `Lookup::Found`
    Found(T),
    /// Return `Lookup::NotFound`
    NotFound,
    /// Return `Lookup::Failed` with this message
    Failed(String),
}

impl<T: Clone> MockLookup<T> {
    fn to_lookup(&self) -> Lookup<T> {
        match self {
            Self::Found(value) => Lookup::Found(value.clone()),
            Self::NotFound => Lookup::NotFound,
            Self::Failed(msg) => Lookup::Failed(Error::GitHubApi(msg.clone())),
        }
    }
}

/// In-memory `PlatformService` with per-PR, per-branch and per-team
/// responses, call recording and error injection.
///
/// Unconfigured restrictions and memberships answer `NotFound`; unconfigured
/// labels and reviews are empty.
pub struct MockPlatformService {
    config: PlatformConfig,
    // Responses
    open_pulls: Mutex<Vec<PullSummary>>,
    search_results: Mutex<HashMap<String, Vec<PullSummary>>>,
    pulls: Mutex<HashMap<u64, PullRequest>>,
    labels: Mutex<HashMap<u64, Vec<String>>>,
    reviews: Mutex<HashMap<u64, Vec<Review>>>,
    restrictions: Mutex<HashMap<String, MockLookup<Restrictions>>>,
    memberships: Mutex<HashMap<(String, String), MockLookup<bool>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    list_calls: Mutex<usize>,
    search_calls: Mutex<Vec<String>>,
    get_pull_calls: Mutex<Vec<u64>>,
    list_labels_calls: Mutex<Vec<u64>>,
    list_reviews_calls: Mutex<Vec<u64>>,
    restrictions_calls: Mutex<Vec<String>>,
    membership_calls: Mutex<Vec<(String, String)>>,
    merge_calls: Mutex<Vec<u64>>,
    update_calls: Mutex<Vec<u64>>,
    delete_branch_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_search: Mutex<Option<String>>,
    error_on_get_pull: Mutex<HashMap<u64, String>>,
    error_on_list_labels: Mutex<Option<String>>,
    error_on_list_reviews: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
    error_on_update: Mutex<Option<String>>,
    error_on_delete_branch: Mutex<Option<String>>,
    hang_on_list: Mutex<bool>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            open_pulls: Mutex::new(Vec::new()),
            search_results: Mutex::new(HashMap::new()),
            pulls: Mutex::new(HashMap::new()),
            labels: Mutex::new(HashMap::new()),
            reviews: Mutex::new(HashMap::new()),
            restrictions: Mutex::new(HashMap::new()),
            memberships: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            list_calls: Mutex::new(0),
            search_calls: Mutex::new(Vec::new()),
            get_pull_calls: Mutex::new(Vec::new()),
            list_labels_calls: Mutex::new(Vec::new()),
            list_reviews_calls: Mutex::new(Vec::new()),
            restrictions_calls: Mutex::new(Vec::new()),
            membership_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            delete_branch_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_search: Mutex::new(None),
            error_on_get_pull: Mutex::new(HashMap::new()),
            error_on_list_labels: Mutex::new(None),
            error_on_list_reviews: Mutex::new(None),
            error_on_merge: Mutex::new(None),
            error_on_update: Mutex::new(None),
            error_on_delete_branch: Mutex::new(None),
            hang_on_list: Mutex::new(false),
        }
    }

    // === Response setup ===

    /// Set the summaries returned by `list_open_pulls`
    pub fn set_open_pulls(&self, pulls: Vec<PullSummary>) {
        *self.open_pulls.lock().unwrap() = pulls;
    }

    /// Set the summaries returned for a search query
    pub fn set_search_results(&self, query: &str, pulls: Vec<PullSummary>) {
        self.search_results
            .lock()
            .unwrap()
            .insert(query.to_string(), pulls);
    }

    /// Set the full record returned by `get_pull`
    pub fn set_pull(&self, pull: PullRequest) {
        self.pulls.lock().unwrap().insert(pull.number, pull);
    }

    /// Set the labels returned by `list_labels`
    pub fn set_labels(&self, pr_number: u64, labels: &[&str]) {
        self.labels
            .lock()
            .unwrap()
            .insert(pr_number, labels.iter().map(ToString::to_string).collect());
    }

    /// Set the reviews returned by `list_reviews`
    pub fn set_reviews(&self, pr_number: u64, reviews: Vec<Review>) {
        self.reviews.lock().unwrap().insert(pr_number, reviews);
    }

    /// Set the restrictions lookup for a branch
    pub fn set_restrictions(&self, branch: &str, lookup: MockLookup<Restrictions>) {
        self.restrictions
            .lock()
            .unwrap()
            .insert(branch.to_string(), lookup);
    }

    /// Set the membership lookup for a login in a team (by slug)
    pub fn set_membership(&self, login: &str, team_slug: &str, lookup: MockLookup<bool>) {
        self.memberships
            .lock()
            .unwrap()
            .insert((login.to_string(), team_slug.to_string()), lookup);
    }

    /// Set the response for `merge_pull` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    /// Register a hydratable open PR that has one approval
    pub fn setup_approved_pr(&self, pull: PullRequest) {
        self.set_reviews(pull.number, vec![crate::common::approval("alice", 0)]);
        self.set_pull(pull);
    }

    // === Error injection methods ===

    /// Make `list_open_pulls` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `search_pulls` return an error
    pub fn fail_search(&self, msg: &str) {
        *self.error_on_search.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_pull` return an error for one PR
    pub fn fail_get_pull(&self, pr_number: u64, msg: &str) {
        self.error_on_get_pull
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `list_labels` return an error
    pub fn fail_list_labels(&self, msg: &str) {
        *self.error_on_list_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_reviews` return an error
    pub fn fail_list_reviews(&self, msg: &str) {
        *self.error_on_list_reviews.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pull` return an error
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_pull` return an error
    pub fn fail_update(&self, msg: &str) {
        *self.error_on_update.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `delete_branch` return an error
    pub fn fail_delete_branch(&self, msg: &str) {
        *self.error_on_delete_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_open_pulls` never return
    pub fn hang_list(&self) {
        *self.hang_on_list.lock().unwrap() = true;
    }

    // === Call verification methods ===

    /// Number of `list_open_pulls` calls
    pub fn list_call_count(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    /// Queries passed to `search_pulls`
    pub fn get_search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `get_pull`
    pub fn get_pull_calls(&self) -> Vec<u64> {
        self.get_pull_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `list_labels`
    pub fn get_list_labels_calls(&self) -> Vec<u64> {
        self.list_labels_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `list_reviews`
    pub fn get_list_reviews_calls(&self) -> Vec<u64> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    /// Branches passed to `get_restrictions`
    pub fn get_restrictions_calls(&self) -> Vec<String> {
        self.restrictions_calls.lock().unwrap().clone()
    }

    /// (login, team slug) pairs passed to `check_team_membership`
    pub fn get_membership_calls(&self) -> Vec<(String, String)> {
        self.membership_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `merge_pull`
    pub fn get_merge_calls(&self) -> Vec<u64> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `update_pull`
    pub fn get_update_calls(&self) -> Vec<u64> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Branches passed to `delete_branch`
    pub fn get_delete_branch_calls(&self) -> Vec<String> {
        self.delete_branch_calls.lock().unwrap().clone()
    }

    /// Total number of remote calls of any kind
    pub fn total_calls(&self) -> usize {
        self.list_call_count()
            + self.get_search_calls().len()
            + self.get_pull_calls().len()
            + self.get_list_labels_calls().len()
            + self.get_list_reviews_calls().len()
            + self.get_restrictions_calls().len()
            + self.get_membership_calls().len()
            + self.get_merge_calls().len()
            + self.get_update_calls().len()
            + self.get_delete_branch_calls().len()
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    slot.lock()
        .unwrap()
        .as_ref()
        .map_or(Ok(()), |msg| Err(Error::GitHubApi(msg.clone())))
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_pulls(&self) -> Result<Vec<PullSummary>> {
        *self.list_calls.lock().unwrap() += 1;
        let hang = *self.hang_on_list.lock().unwrap();
        if hang {
            std::future::pending::<()>().await;
        }
        injected(&self.error_on_list)?;
        Ok(self.open_pulls.lock().unwrap().clone())
    }

    async fn search_pulls(&self, query: &str) -> Result<Vec<PullSummary>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        injected(&self.error_on_search)?;
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_pull(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pull_calls.lock().unwrap().push(pr_number);
        if let Some(msg) = self.error_on_get_pull.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        self.pulls
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .map(|pull| PullRequest {
                labels: None,
                ..pull
            })
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))
    }

    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>> {
        self.list_labels_calls.lock().unwrap().push(pr_number);
        injected(&self.error_on_list_labels)?;
        Ok(self
            .labels
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        self.list_reviews_calls.lock().unwrap().push(pr_number);
        injected(&self.error_on_list_reviews)?;
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_restrictions(&self, branch: &str) -> Lookup<Restrictions> {
        self.restrictions_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        self.restrictions
            .lock()
            .unwrap()
            .get(branch)
            .map_or(Lookup::NotFound, MockLookup::to_lookup)
    }

    async fn check_team_membership(&self, login: &str, team: &Team) -> Lookup<bool> {
        let key = (login.to_string(), team.slug.clone());
        self.membership_calls.lock().unwrap().push(key.clone());
        self.memberships
            .lock()
            .unwrap()
            .get(&key)
            .map_or(Lookup::NotFound, MockLookup::to_lookup)
    }

    async fn merge_pull(&self, pull: &PullRequest) -> Result<MergeResult> {
        self.merge_calls.lock().unwrap().push(pull.number);
        injected(&self.error_on_merge)?;
        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pull.number)
            .cloned()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{}", pull.number)),
                message: None,
            }))
    }

    async fn update_pull(&self, pull: &PullRequest) -> Result<UpdateResult> {
        self.update_calls.lock().unwrap().push(pull.number);
        injected(&self.error_on_update)?;
        Ok(UpdateResult {
            sha: Some(format!("update_sha_{}", pull.number)),
        })
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.delete_branch_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        injected(&self.error_on_delete_branch)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::with_config(crate::common::github_config())
    }
}
