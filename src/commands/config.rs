//! Config command implementation.

use anyhow::Result;

use crate::config::Config;

/// Print the default configuration template
pub fn run() -> Result<()> {
    print!("{}", Config::generate_default_yaml());
    Ok(())
}
