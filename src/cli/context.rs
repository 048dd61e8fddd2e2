//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by run, decide and pr commands.

use mergerine::auth::get_github_auth;
use mergerine::config::{Config, DEFAULT_CONFIG_FILE};
use mergerine::error::Result;
use mergerine::platform::{GitHubService, PlatformService};
use std::path::Path;
use tracing::debug;

/// Load the config file and apply environment overrides
///
/// An explicitly given path must exist; the default `mergerine.toml` is
/// optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path, true)?,
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE), false)?,
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Shared context for CLI commands that interact with the platform
pub struct CommandContext {
    /// Validated configuration
    pub config: Config,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Validate the configuration, resolve a token and create the service
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let auth = get_github_auth(config.token.as_deref(), |key| std::env::var(key).ok()).await?;
        debug!(source = %auth.source, "resolved GitHub token");

        let platform = GitHubService::new(
            &auth.token,
            config.owner.clone(),
            config.name.clone(),
            config.base_url.clone(),
        )?;

        Ok(Self {
            config,
            platform: Box::new(platform),
        })
    }
}
