//! Configuration management for rosdrop.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::fetcher::{
    RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_MS,
};
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::render::DEFAULT_TIMEOUT_DAYS;
use crate::validation::{AddressFamily, Validator};

const DEFAULT_OUTPUT_DIR: &str = "build";

/// List names end up in file names and script text
fn is_valid_list_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._-".contains(c))
}

/// RouterOS menu path such as `/ip` or `/ipv6`
fn is_valid_command_path(path: &str) -> bool {
    path.len() > 1
        && path.starts_with('/')
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/-_".contains(c))
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lifetime of each dynamic address-list entry, in days
    pub timeout_days: u32,

    /// Directory receiving the generated `.rsc` scripts
    pub output_dir: PathBuf,

    /// Total fetch attempts per feed, including the first
    pub max_attempts: u32,

    /// Fixed delay between fetch attempts
    pub retry_delay_ms: u64,

    /// Per-request timeout; a timeout counts as a retryable failure
    pub request_timeout_secs: u64,

    /// Feeds to convert, processed in order
    pub sources: Vec<FeedSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_days: DEFAULT_TIMEOUT_DAYS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(real_fs(), path.as_ref())
    }

    pub fn load_with(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.timeout_days == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !source.url.starts_with("https://") {
                return Err(ConfigError::InsecureUrl {
                    name: source.list_name.clone(),
                    url: source.url.clone(),
                });
            }
            if !is_valid_list_name(&source.list_name) {
                return Err(ConfigError::InvalidListName(source.list_name.clone()));
            }
            if !is_valid_command_path(&source.command_path) {
                return Err(ConfigError::InvalidCommandPath(source.command_path.clone()));
            }
            if !seen.insert(source.list_name.as_str()) {
                return Err(ConfigError::DuplicateListName(source.list_name.clone()));
            }
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Sources to process, optionally restricted to one family
    pub fn sources_for(&self, family: Option<AddressFamily>) -> Vec<&FeedSource> {
        self.sources
            .iter()
            .filter(|s| family.map_or(true, |f| s.family == f))
            .collect()
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// One feed and the address list it is converted into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub family: AddressFamily,
    pub url: String,
    pub list_name: String,
    pub command_path: String,
}

impl FeedSource {
    /// Spamhaus DROP source for `family`
    pub fn for_family(family: AddressFamily) -> Self {
        Self {
            family,
            url: format!("https://www.spamhaus.org/drop/drop_{}.json", family),
            list_name: format!("spamhaus-drop-{}", family),
            command_path: family.command_path().to_string(),
        }
    }

    pub fn validator(&self) -> Validator {
        self.family.validator()
    }
}

fn default_sources() -> Vec<FeedSource> {
    AddressFamily::ALL
        .into_iter()
        .map(FeedSource::for_family)
        .collect()
}
