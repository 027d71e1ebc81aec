//! Error handling for the Parley CLI

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("session error: {0}")]
    Session(#[from] parley_core::SessionError),

    #[error("connection error: {0}")]
    Client(#[from] parley_ws::ClientError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
