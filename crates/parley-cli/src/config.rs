//! Application configuration
//!
//! TOML-backed configuration with defaults suitable for a local server.
//! CLI flags override individual fields after loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use parley_core::SessionConfig;

use crate::error::Result;

/// Top-level configuration for the terminal client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub user: UserConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the chat server.
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Display name shown to other users.
    pub display_name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            display_name: "Anonymous".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Platform config file location, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("parley").join("config.toml"))
    }

    /// Load the default config file when present, built-in defaults otherwise.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.url, "ws://127.0.0.1:5000");
        assert_eq!(config.user.display_name, "Anonymous");
        assert_eq!(config.session.logout_path, "/logout");
    }

    #[test]
    fn test_partial_toml_keeps_defaults_for_the_rest() {
        let raw = r#"
            [server]
            url = "wss://chat.example.com"

            [session]
            redirect_delay_ms = 500
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.url, "wss://chat.example.com");
        assert_eq!(config.user.display_name, "Anonymous");
        assert_eq!(config.session.redirect_delay_ms, 500);
        assert_eq!(config.session.logout_path, "/logout");
    }
}
