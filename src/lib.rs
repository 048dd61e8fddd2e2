//! mergerine - auto-merge bot for GitHub pull requests
//!
//! Each poll cycle fetches the open PRs of one repository, evaluates them
//! against label, review and branch-restriction rules, and picks at most one
//! action: merge a PR, update a PR from its base branch, or wait.

pub mod auth;
pub mod config;
pub mod decide;
pub mod error;
pub mod execute;
pub mod platform;
pub mod types;
