//! Session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for session termination behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path the session navigates to after a terminal close.
    pub logout_path: String,
    /// Delay between the terminal notice and the logout redirect.
    pub redirect_delay_ms: u64,
}

impl SessionConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logout_path: "/logout".to_string(),
            redirect_delay_ms: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.logout_path, "/logout");
        assert_eq!(config.redirect_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"logout_path":"/bye"}"#).unwrap();
        assert_eq!(config.logout_path, "/bye");
        assert_eq!(config.redirect_delay_ms, 2_000);
    }
}
