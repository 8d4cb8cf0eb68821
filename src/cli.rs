//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::validation::AddressFamily;

#[derive(Parser)]
#[command(name = "rosdrop")]
#[command(author, version, about = "Convert Spamhaus DROP feeds into RouterOS address-list scripts")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the feeds and generate RouterOS scripts
    Update {
        /// Only process one address family
        #[arg(long, value_enum)]
        family: Option<AddressFamily>,

        /// Override the output directory
        #[arg(long, short)]
        output_dir: Option<PathBuf>,

        /// Print scripts to stdout instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check whether an address would be accepted from a feed
    Check {
        /// IP address or CIDR to check
        address: String,

        /// Only check against one address family
        #[arg(long, value_enum)]
        family: Option<AddressFamily>,
    },

    /// Print the default configuration file
    Config,

    /// Show version
    Version,
}
