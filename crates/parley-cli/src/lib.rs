//! Parley CLI library
//!
//! Components of the Parley terminal client: argument parsing, TOML
//! configuration, the input-line command language, and the terminal
//! implementation of the session's UI hooks.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod terminal;

pub use app::ParleyApp;
pub use cli::Cli;
pub use config::AppConfig;
pub use error::{CliError, Result};
