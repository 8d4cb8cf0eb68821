//! Update command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::FeedSource;
use crate::fetcher::{Fetcher, HttpTransport};
use crate::fs_abstraction::real_fs;
use crate::pipeline::Pipeline;
use crate::render::RouterOsRenderer;
use crate::utils::format_count;
use crate::validation::AddressFamily;

use super::load_config;

/// Run the update command
pub async fn run(
    config_path: Option<&Path>,
    family: Option<AddressFamily>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let mut config = load_config(config_path).context("Failed to load config")?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let sources: Vec<FeedSource> = config.sources_for(family).into_iter().cloned().collect();
    if sources.is_empty() {
        warn!("No feed sources selected. Check your configuration.");
        return Ok(());
    }

    let transport = HttpTransport::new(config.request_timeout())?;
    let fetcher = Fetcher::new(transport, config.retry_policy());
    let renderer = RouterOsRenderer::new(config.timeout_days);

    let summary = Pipeline::new(&fetcher, &renderer, real_fs(), &config.output_dir)
        .dry_run(dry_run)
        .run(&sources)
        .await?;

    if !dry_run {
        info!(
            "[OK] {} scripts written to {} ({} entries)",
            summary.written(),
            config.output_dir.display(),
            format_count(summary.total_entries())
        );
    }

    Ok(())
}
