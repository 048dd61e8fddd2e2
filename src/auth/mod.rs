//! Authentication for GitHub
//!
//! Supports environment variables, the config file and the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the config file
    ConfigFile,
    /// Token from CLI tool (gh)
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar => write!(f, "environment"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Cli => write!(f, "gh CLI"),
        }
    }
}
