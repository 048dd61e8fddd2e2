//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{Lookup, PlatformService};
use crate::types::{
    MergeResult, MergeableState, PlatformConfig, PrState, PullRequest, PullSummary,
    Restrictions, Review, ReviewState, Team, UpdateResult,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size for list and search requests
const PER_PAGE: u8 = 100;

/// The search API serves at most this many results per query
const SEARCH_RESULT_LIMIT: usize = 1000;

// Raw REST payloads for endpoints handled through reqwest

#[derive(Deserialize)]
struct LabelRef {
    name: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    total_count: usize,
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    number: u64,
    state: String,
    #[serde(default)]
    labels: Vec<LabelRef>,
    /// Present only when the issue is a pull request
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Deserialize)]
struct TeamRef {
    name: String,
    slug: String,
    members_url: Option<String>,
}

#[derive(Deserialize)]
struct RestrictionsResponse {
    #[serde(default)]
    users: Vec<UserRef>,
    #[serde(default)]
    teams: Vec<TeamRef>,
}

/// Body of `POST /repos/{owner}/{repo}/merges`
#[derive(Serialize)]
struct MergeBranchesPayload<'a> {
    /// Branch receiving the merge
    base: &'a str,
    /// Branch being merged in
    head: &'a str,
    commit_message: String,
}

#[derive(Deserialize)]
struct MergeCommit {
    sha: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (search, labels, protection, membership)
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `base_url` defaults to the public API; pass the `/api/v3` URL for
    /// GitHub Enterprise.
    pub fn new(
        token: &str,
        owner: String,
        repo: String,
        base_url: Option<String>,
    ) -> Result<Self> {
        let base_url = base_url.map_or_else(
            || DEFAULT_API_URL.to_string(),
            |url| url.trim_end_matches('/').to_string(),
        );

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&base_url)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("mergerine")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                owner,
                repo,
                base_url,
            },
            token: token.to_string(),
            http_client,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.config.base_url, self.config.owner, self.config.repo, path
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// GET a JSON resource, keeping 404 apart from other failures
    async fn lookup_json<T: DeserializeOwned>(&self, url: &str) -> Lookup<T> {
        let response = match self.request(Method::GET, url).send().await {
            Ok(response) => response,
            Err(e) => return Lookup::Failed(e.into()),
        };

        if response.status() == StatusCode::NOT_FOUND {
            return Lookup::NotFound;
        }

        match response.error_for_status() {
            Ok(response) => Lookup::from_result(response.json::<T>().await.map_err(Error::from)),
            Err(e) => Lookup::Failed(e.into()),
        }
    }

    /// GET a resource whose existence is the answer (e.g. 204 for membership)
    async fn lookup_status(&self, url: &str) -> Lookup<()> {
        match self.request(Method::GET, url).send().await {
            Ok(response) if response.status() == StatusCode::NOT_FOUND => Lookup::NotFound,
            Ok(response) => Lookup::from_result(
                response
                    .error_for_status()
                    .map(|_| ())
                    .map_err(Error::from),
            ),
            Err(e) => Lookup::Failed(e.into()),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let value = self
            .request(Method::GET, url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    fn team_member_url(&self, login: &str, team: &Team) -> String {
        team.members_url.as_ref().map_or_else(
            || {
                format!(
                    "{}/orgs/{}/teams/{}/members/{login}",
                    self.config.base_url, self.config.owner, team.slug
                )
            },
            |template| template.replace("{/member}", &format!("/{login}")),
        )
    }
}

fn state_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PrState {
    match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    }
}

const fn mergeable_from_octocrab(state: &octocrab::models::pulls::MergeableState) -> MergeableState {
    use octocrab::models::pulls::MergeableState as Gh;
    match state {
        Gh::Clean => MergeableState::Clean,
        Gh::Behind => MergeableState::Behind,
        Gh::Dirty => MergeableState::Dirty,
        Gh::Blocked => MergeableState::Blocked,
        Gh::Unknown => MergeableState::Unknown,
        Gh::Draft => MergeableState::Draft,
        Gh::Unstable => MergeableState::Unstable,
        Gh::HasHooks => MergeableState::HasHooks,
        _ => MergeableState::Other,
    }
}

const fn review_state_from_octocrab(state: &octocrab::models::pulls::ReviewState) -> ReviewState {
    use octocrab::models::pulls::ReviewState as Gh;
    match state {
        Gh::Approved => ReviewState::Approved,
        Gh::ChangesRequested => ReviewState::ChangesRequested,
        Gh::Commented => ReviewState::Commented,
        Gh::Dismissed => ReviewState::Dismissed,
        Gh::Pending => ReviewState::Pending,
        _ => ReviewState::Other,
    }
}

fn label_names(labels: Option<&Vec<octocrab::models::Label>>) -> Option<Vec<String>> {
    labels.map(|labels| labels.iter().map(|l| l.name.clone()).collect())
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_pulls(&self) -> Result<Vec<PullSummary>> {
        debug!("listing open PRs");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let pulls = self.client.all_pages(page).await?;

        let summaries: Vec<PullSummary> = pulls
            .iter()
            .map(|pr| PullSummary {
                number: pr.number,
                state: state_from_octocrab(pr),
                mergeable_state: pr.mergeable_state.as_ref().map(mergeable_from_octocrab),
                labels: label_names(pr.labels.as_ref()),
            })
            .collect();
        debug!(count = summaries.len(), "listed open PRs");
        Ok(summaries)
    }

    async fn search_pulls(&self, query: &str) -> Result<Vec<PullSummary>> {
        debug!(query, "searching PRs");
        let url = format!("{}/search/issues", self.config.base_url);
        let per_page = PER_PAGE.to_string();
        let mut items = Vec::new();
        let mut seen = 0;

        for page in 1_u32.. {
            let page = page.to_string();
            let response: SearchResponse = self
                .request(Method::GET, &url)
                .query(&[
                    ("q", query),
                    ("per_page", per_page.as_str()),
                    ("page", page.as_str()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            let fetched = response.items.len();
            seen += fetched;
            items.extend(response.items);
            debug!(page = %page, fetched, total = response.total_count, "fetched search page");

            if fetched < usize::from(PER_PAGE)
                || seen >= response.total_count
                || seen >= SEARCH_RESULT_LIMIT
            {
                break;
            }
        }

        let summaries: Vec<PullSummary> = items
            .into_iter()
            .filter(|item| item.pull_request.is_some())
            .map(|item| PullSummary {
                number: item.number,
                state: if item.state == "open" {
                    PrState::Open
                } else {
                    PrState::Closed
                },
                mergeable_state: None,
                labels: Some(item.labels.into_iter().map(|l| l.name).collect()),
            })
            .collect();
        debug!(count = summaries.len(), "search matched PRs");
        Ok(summaries)
    }

    async fn get_pull(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let pull = PullRequest {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            state: state_from_octocrab(&pr),
            mergeable_state: pr
                .mergeable_state
                .as_ref()
                .map_or(MergeableState::Unknown, mergeable_from_octocrab),
            base_ref: pr.base.ref_field.clone(),
            head_ref: pr.head.ref_field.clone(),
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            labels: None,
        };

        debug!(pr_number, state = %pull.state, mergeable_state = %pull.mergeable_state, "got PR");
        Ok(pull)
    }

    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>> {
        debug!(pr_number, "listing PR labels");
        let url = self.repo_url(&format!("/issues/{pr_number}/labels"));
        let labels: Vec<LabelRef> = self.get_json(&url).await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        debug!(pr_number, "listing PR reviews");
        let reviews = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(pr_number)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let reviews = self.client.all_pages(reviews).await?;

        let result: Vec<Review> = reviews
            .into_iter()
            .map(|r| Review {
                login: r.user.map(|u| u.login).unwrap_or_default(),
                state: r
                    .state
                    .as_ref()
                    .map_or(ReviewState::Other, review_state_from_octocrab),
                submitted_at: r.submitted_at,
            })
            .collect();
        debug!(pr_number, count = result.len(), "listed PR reviews");
        Ok(result)
    }

    async fn get_restrictions(&self, branch: &str) -> Lookup<Restrictions> {
        debug!(branch, "getting branch restrictions");
        let url = self.repo_url(&format!(
            "/branches/{}/protection/restrictions",
            urlencoding::encode(branch)
        ));

        match self.lookup_json::<RestrictionsResponse>(&url).await {
            Lookup::Found(raw) => Lookup::Found(Restrictions {
                users: raw.users.into_iter().map(|u| u.login).collect(),
                teams: raw
                    .teams
                    .into_iter()
                    .map(|t| Team {
                        name: t.name,
                        slug: t.slug,
                        members_url: t.members_url,
                    })
                    .collect(),
            }),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }

    async fn check_team_membership(&self, login: &str, team: &Team) -> Lookup<bool> {
        let url = self.team_member_url(login, team);
        debug!(login, team = %team.name, %url, "checking team membership");
        match self.lookup_status(&url).await {
            Lookup::Found(()) => Lookup::Found(true),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }

    async fn merge_pull(&self, pull: &PullRequest) -> Result<MergeResult> {
        let pr_number = pull.number;
        debug!(pr_number, "merging PR");

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Merge)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn update_pull(&self, pull: &PullRequest) -> Result<UpdateResult> {
        let pr_number = pull.number;
        debug!(pr_number, base = %pull.base_ref, head = %pull.head_ref, "updating PR from base");

        // Inverted on purpose: the PR branch receives the base branch
        let payload = MergeBranchesPayload {
            base: &pull.head_ref,
            head: &pull.base_ref,
            commit_message: format!("Merge branch '{}' into {}", pull.base_ref, pull.head_ref),
        };

        let response = self
            .request(Method::POST, &self.repo_url("/merges"))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!(pr_number, "head already contains base");
            return Ok(UpdateResult { sha: None });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Update of PR #{pr_number} failed ({status}): {body}"
            )));
        }

        let commit: MergeCommit = response.json().await?;
        debug!(pr_number, sha = %commit.sha, "update complete");
        Ok(UpdateResult {
            sha: Some(commit.sha),
        })
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "deleting branch");
        self.request(
            Method::DELETE,
            &self.repo_url(&format!("/git/refs/heads/{}", urlencoding::encode(branch))),
        )
        .send()
        .await?
        .error_for_status()?;
        debug!(branch, "deleted branch");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
