//! Parley CLI - terminal chat client entry point

use std::path::Path;

use clap::Parser;
use tracing::info;

use parley_cli::{app::ParleyApp, cli::Cli, config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    setup_logging(cli.verbose);

    // Load configuration, then apply flag overrides
    let mut config = load_configuration(&cli)?;
    if let Some(server) = &cli.server {
        config.server.url = server.clone();
    }
    if let Some(name) = &cli.name {
        config.user.display_name = name.clone();
    }

    // Run one session to completion
    let app = ParleyApp::new(config);
    app.run().await?;
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(config_path) = &cli.config {
        info!("Loading configuration from: {}", config_path);
        AppConfig::load_from_file(Path::new(config_path))
    } else {
        AppConfig::load_default()
    }
}
