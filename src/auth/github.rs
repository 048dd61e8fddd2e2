//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in priority order
const TOKEN_VARS: [&str; 2] = ["MERGERINE_GITHUB_TOKEN", "GITHUB_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a GitHub token.
///
/// Order: `MERGERINE_GITHUB_TOKEN`, `GITHUB_TOKEN`, the config file's
/// `token`, then `gh auth token`.
pub async fn get_github_auth<F>(config_token: Option<&str>, var: F) -> Result<GitHubAuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    for name in TOKEN_VARS {
        if let Some(token) = var(name).filter(|t| !t.trim().is_empty()) {
            debug!(var = name, "using GitHub token from environment");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = config_token.filter(|t| !t.trim().is_empty()) {
        debug!("using GitHub token from config file");
        return Ok(GitHubAuthConfig {
            token: token.trim().to_string(),
            source: AuthSource::ConfigFile,
        });
    }

    if let Some(token) = gh_cli_token().await {
        debug!("using GitHub token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "No GitHub token found. Set MERGERINE_GITHUB_TOKEN or GITHUB_TOKEN, add `token` to the config file, or run `gh auth login`.".to_string(),
    ))
}

async fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
