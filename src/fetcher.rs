//! HTTP fetcher for downloading DROP feeds.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::config::FeedSource;
use crate::error::FetchError;
use crate::feed::{parse_feed, ParsedFeed};
use crate::utils::{format_bytes, format_count};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum size of a feed body (10 MB)
/// The v4 DROP list is around 100 KB, so this leaves ample margin
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024;

/// Single GET of a feed URL.
///
/// Implementations return the body of a 200 response and map every other
/// outcome onto a [`FetchError`]; retrying is left to [`Fetcher`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    max_body_size: usize,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `request_timeout`
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(format!("rosdrop/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            max_body_size: MAX_FEED_SIZE,
        })
    }

    /// Override the body size limit
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }
}

/// Flatten an error and its `source()` chain into one message
fn describe_error<E>(error: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:#}", anyhow::Error::new(error))
}

fn transport_error(error: reqwest::Error) -> FetchError {
    FetchError::Transport(describe_error(error))
}

#[async_trait]
impl FeedTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_body_size {
                return Err(FetchError::Parse(format!(
                    "Response too large: {} bytes (max: {} bytes)",
                    content_length, self.max_body_size
                )));
            }
        }

        // Content-Length may be absent, so enforce the limit while reading
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            if body.len() + chunk.len() > self.max_body_size {
                return Err(FetchError::Parse(format!(
                    "Downloaded content too large: more than {} bytes",
                    self.max_body_size
                )));
            }
            body.extend_from_slice(&chunk);
        }

        // Invalid bytes only spoil the line they sit on
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Bounded retry with a fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Fetches feeds through a [`FeedTransport`] under a [`RetryPolicy`]
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: FeedTransport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch and parse the feed of a single source
    pub async fn fetch_feed(&self, source: &FeedSource) -> Result<ParsedFeed, FetchError> {
        let body = self.fetch_with_retry(&source.url).await?;
        debug!("Received {} from {}", format_bytes(body.len() as u64), source.url);

        let feed = parse_feed(&body, source.family);

        if feed.is_empty() {
            warn!("No valid {} addresses found after parsing", source.family);
        }
        if feed.skipped > 0 {
            warn!(
                "Skipped {} invalid or non-CIDR lines for {}",
                format_count(feed.skipped),
                source.family
            );
        }

        Ok(feed)
    }

    /// Fetch a body, retrying transport and status failures.
    ///
    /// Attempts run back to back with `policy.delay` between them. Once
    /// `policy.max_attempts` tries have failed the last error is returned
    /// wrapped in [`FetchError::Exhausted`].
    pub async fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut attempts = 0;

        loop {
            let error = match self.transport.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            attempts += 1;
            if attempts >= self.policy.max_attempts {
                return Err(FetchError::Exhausted {
                    attempts,
                    source: Box::new(error),
                });
            }

            info!(
                "Retrying ({}/{}) for {}: {}",
                attempts, self.policy.max_attempts, url, error
            );
            tokio::time::sleep(self.policy.delay).await;
        }
    }
}
