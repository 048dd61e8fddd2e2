//! Bot configuration
//!
//! Assembled once at startup from the TOML file, then environment overrides,
//! then CLI flags. The decision engine only ever sees [`DecideOptions`].

use crate::decide::{DecideOptions, LookupFailurePolicy, PullsMode};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default config filename, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mergerine.toml";

/// Default poll interval (2 minutes)
pub const DEFAULT_INTERVAL_MS: u64 = 120_000;

/// Full bot configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// API base URL; `None` means the public GitHub API
    pub base_url: Option<String>,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Issue search query used in search mode
    pub query: Option<String>,
    /// How candidate PRs are retrieved; inferred from `query` when absent
    pub pulls_mode: Option<PullsMode>,
    /// Labels every candidate must carry
    pub labels: Vec<String>,
    /// Labels no candidate may carry
    pub not_labels: Vec<String>,
    /// API token (environment variables take precedence)
    pub token: Option<String>,
    /// Poll interval in milliseconds
    pub interval_ms: u64,
    /// Delete the head branch after a successful merge
    pub delete_branch_after_merge: bool,
    /// Log decisions without performing writes
    pub dry: bool,
    /// What a failed restriction or membership lookup means
    pub on_lookup_error: LookupFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            owner: String::new(),
            name: String::new(),
            query: None,
            pulls_mode: None,
            labels: Vec::new(),
            not_labels: Vec::new(),
            token: None,
            interval_ms: DEFAULT_INTERVAL_MS,
            delete_branch_after_merge: false,
            dry: false,
            on_lookup_error: LookupFailurePolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults unless `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return Err(Error::Config(format!("{} not found", path.display())));
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `MERGERINE_*` overrides using the given variable lookup
    ///
    /// Token variables are handled by [`crate::auth`].
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(interval) = var("MERGERINE_INTERVAL") {
            self.interval_ms = interval.trim().parse().map_err(|e| {
                Error::Config(format!("MERGERINE_INTERVAL must be milliseconds: {e}"))
            })?;
        }
        if var("MERGERINE_DELETE_BRANCH_AFTER_MERGE").as_deref() == Some("true") {
            self.delete_branch_after_merge = true;
        }
        if var("MERGERINE_DRY").as_deref() == Some("true") {
            self.dry = true;
        }
        Ok(())
    }

    /// Effective pull retrieval mode
    pub fn pulls_mode(&self) -> PullsMode {
        self.pulls_mode
            .unwrap_or_else(|| PullsMode::infer(self.query.as_deref()))
    }

    /// Check that the configuration can drive a decision cycle
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(Error::Config("`owner` is required".to_string()));
        }
        if self.name.is_empty() {
            return Err(Error::Config("`name` is required".to_string()));
        }
        if self.pulls_mode() == PullsMode::Search
            && self.query.as_deref().is_none_or(str::is_empty)
        {
            return Err(Error::Config(
                "`query` is required when `pulls_mode` is \"search\"".to_string(),
            ));
        }
        if self.interval_ms == 0 {
            return Err(Error::Config("`interval_ms` must be positive".to_string()));
        }
        Ok(())
    }

    /// Options handed to the decision engine
    pub fn decide_options(&self) -> DecideOptions {
        DecideOptions {
            pulls_mode: self.pulls_mode(),
            query: self.query.clone(),
            labels: self.labels.clone(),
            not_labels: self.not_labels.clone(),
            on_lookup_error: self.on_lookup_error,
        }
    }
}
