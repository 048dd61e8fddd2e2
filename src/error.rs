//! Error types for mergerine

use thiserror::Error;

/// Errors surfaced by the decision engine, the platform layer and the executor
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned an error or an unexpected payload
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error from the octocrab client
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Raw HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable token could be found
    #[error("authentication error: {0}")]
    Auth(String),

    /// A restriction or membership lookup failed under the strict policy
    #[error("{what} lookup failed for PR #{pr_number}: {message}")]
    LookupFailed {
        /// Which lookup failed ("restrictions" or "team membership")
        what: &'static str,
        /// PR being evaluated when the lookup failed
        pr_number: u64,
        /// Underlying failure
        message: String,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
