//! CLI command implementations.

pub mod check;
pub mod config;
pub mod update;

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::config::Config;

/// Load the config file when one is given, otherwise use built-in defaults
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => {
            debug!("No config file given, using defaults");
            Ok(Config::default())
        }
    }
}
