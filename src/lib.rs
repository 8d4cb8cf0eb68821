//! # rosdrop - Spamhaus DROP lists as RouterOS scripts
//!
//! Fetches the Spamhaus "Don't Route Or Peer" feeds and converts them into
//! RouterOS scripts that load every listed network into a dynamic firewall
//! address list with an expiration timeout.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        rosdrop                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: update, check, config, version             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── One FeedSource per address family (v4, v6)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline                                                   │
//! │    ├── Fetcher (reqwest + rustls, fixed-delay retry)        │
//! │    ├── Feed parser (JSON lines, per-line skip)              │
//! │    │     └── Validators (regex, per family)                 │
//! │    ├── Renderer (RouterOS address-list script)              │
//! │    └── Output (<output_dir>/<list_name>.rsc)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use rosdrop::config::Config;
//! use rosdrop::fetcher::{Fetcher, HttpTransport};
//! use rosdrop::fs_abstraction::real_fs;
//! use rosdrop::pipeline::Pipeline;
//! use rosdrop::render::RouterOsRenderer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!
//!     let transport = HttpTransport::new(config.request_timeout())?;
//!     let fetcher = Fetcher::new(transport, config.retry_policy());
//!     let renderer = RouterOsRenderer::new(config.timeout_days);
//!
//!     let summary = Pipeline::new(&fetcher, &renderer, real_fs(), &config.output_dir)
//!         .run(&config.sources)
//!         .await?;
//!     println!("{} scripts written", summary.written());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Fetch, record and config error types
//! - [`feed`] - Feed line decoding and parsing
//! - [`fetcher`] - HTTP transport and retry loop
//! - [`fs_abstraction`] - Filesystem seam for output and config
//! - [`pipeline`] - Per-source fetch, render and write orchestration
//! - [`render`] - RouterOS script generation
//! - [`utils`] - Formatting helpers
//! - [`validation`] - Address validators per family

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod fs_abstraction;
pub mod pipeline;
pub mod render;
pub mod utils;
pub mod validation;

pub use cli::{Cli, Commands};
pub use config::{Config, FeedSource};
pub use error::{FetchError, RecordError};
pub use validation::AddressFamily;
