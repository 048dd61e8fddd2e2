//! Shared test utilities

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{MockLookup, MockPlatformService};

use chrono::{DateTime, TimeZone, Utc};
use mergerine::decide::DecideOptions;
use mergerine::types::{
    MergeableState, PlatformConfig, PrState, PullRequest, PullSummary, Restrictions, Review,
    ReviewState, Team,
};

/// Config for a GitHub repo used across tests
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        base_url: "https://api.github.com".to_string(),
    }
}

/// Fixed point in time, offset by `minutes`
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + minutes * 60, 0).unwrap()
}

/// Open PR targeting `main` with no labels attached yet
pub fn make_pr(number: u64, mergeable_state: MergeableState) -> PullRequest {
    PullRequest {
        number,
        title: format!("Change {number}"),
        state: PrState::Open,
        mergeable_state,
        base_ref: "main".to_string(),
        head_ref: format!("feat-{number}"),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        labels: None,
    }
}

/// Open PR with labels already attached
pub fn make_labeled_pr(number: u64, mergeable_state: MergeableState, labels: &[&str]) -> PullRequest {
    PullRequest {
        labels: Some(labels.iter().map(ToString::to_string).collect()),
        ..make_pr(number, mergeable_state)
    }
}

/// Open summary as returned by the list endpoint (no mergeable state)
pub fn make_summary(number: u64) -> PullSummary {
    PullSummary {
        number,
        state: PrState::Open,
        mergeable_state: None,
        labels: None,
    }
}

/// Review by `login` submitted `minutes` after the reference time
pub fn review(login: &str, state: ReviewState, minutes: i64) -> Review {
    Review {
        login: login.to_string(),
        state,
        submitted_at: Some(at(minutes)),
    }
}

/// Approval by `login`
pub fn approval(login: &str, minutes: i64) -> Review {
    review(login, ReviewState::Approved, minutes)
}

/// Change request by `login`
pub fn changes_requested(login: &str, minutes: i64) -> Review {
    review(login, ReviewState::ChangesRequested, minutes)
}

/// Team with a members URL template
pub fn team(slug: &str) -> Team {
    Team {
        name: slug.to_string(),
        slug: slug.to_string(),
        members_url: Some(format!(
            "https://api.github.com/organizations/1/team/{slug}/members{{/member}}"
        )),
    }
}

/// Restrictions allowing the given users and teams
pub fn restrictions(users: &[&str], teams: &[&str]) -> Restrictions {
    Restrictions {
        users: users.iter().map(ToString::to_string).collect(),
        teams: teams.iter().map(|slug| team(slug)).collect(),
    }
}

/// Options with no label rules, list mode, lenient lookups
pub fn default_options() -> DecideOptions {
    DecideOptions::default()
}

/// Options requiring and forbidding labels
pub fn label_options(required: &[&str], forbidden: &[&str]) -> DecideOptions {
    DecideOptions {
        labels: required.iter().map(ToString::to_string).collect(),
        not_labels: forbidden.iter().map(ToString::to_string).collect(),
        ..DecideOptions::default()
    }
}
