//! Command-line interface definitions and parsing

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Chat server base URL (overrides the config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Your display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
