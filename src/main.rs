//! rosdrop - Spamhaus DROP to RouterOS script converter

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rosdrop::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Update {
            family,
            output_dir,
            dry_run,
        } => rosdrop::commands::update::run(cli.config.as_deref(), family, output_dir, dry_run).await,
        Commands::Check { address, family } => rosdrop::commands::check::run(&address, family),
        Commands::Config => rosdrop::commands::config::run(),
        Commands::Version => {
            println!("rosdrop {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
