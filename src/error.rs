//! Error types for rosdrop.

use thiserror::Error;

use crate::validation::AddressFamily;

/// Failure while retrieving a feed.
///
/// Only [`FetchError::Transport`] and [`FetchError::Status`] are retried;
/// everything else ends the fetch immediately.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Transport(String),

    #[error("Request failed with status {0}")]
    Status(u16),

    #[error("Failed to parse IP list: {0}")]
    Parse(String),

    #[error("Failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status(_))
    }
}

/// Why a single feed line produced no entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("record has no cidr field")]
    MissingAddress,

    #[error("invalid {family} address: {value}")]
    InvalidAddress {
        family: AddressFamily,
        value: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No feed sources configured")]
    NoSources,

    #[error("Source '{name}' URL must use HTTPS: {url}")]
    InsecureUrl { name: String, url: String },

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("timeout_days must be at least 1")]
    ZeroTimeout,

    #[error("Invalid list name '{0}': use letters, digits, '.', '_' or '-'")]
    InvalidListName(String),

    #[error("Invalid command path '{0}': expected a RouterOS menu such as /ip")]
    InvalidCommandPath(String),

    #[error("Duplicate list name '{0}'")]
    DuplicateListName(String),
}
