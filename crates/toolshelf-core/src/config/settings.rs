//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult};

/// Environment variable overriding `api_base`
pub const ENV_API_BASE: &str = "TOOLSHELF_API_BASE";
/// Environment variable overriding `agent_url`
pub const ENV_AGENT_URL: &str = "WEBHOOK_URL";

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_AGENT_URL: &str = "http://agent:8889";
pub const DEFAULT_PREREQUISITE_FLAG: &str = "n8n_enabled";

/// Configuration for the tools panel and its backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolshelfConfig {
    /// Base URL of the catalog and settings API
    pub api_base: String,
    /// Base URL of the agent serving `/memory`
    pub agent_url: String,
    /// Per-request timeout; none leaves it to the transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Settings key that must be truthy before tools can be installed
    pub prerequisite_flag: String,
    /// Re-fetch the catalog after an install finishes
    pub refresh_after_install: bool,
}

impl Default for ToolshelfConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            agent_url: DEFAULT_AGENT_URL.to_string(),
            request_timeout_secs: None,
            prerequisite_flag: DEFAULT_PREREQUISITE_FLAG.to_string(),
            refresh_after_install: false,
        }
    }
}

impl ToolshelfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Set the agent URL
    pub fn with_agent_url(mut self, url: impl Into<String>) -> Self {
        self.agent_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Enable or disable catalog refresh after install
    pub fn with_refresh_after_install(mut self, enabled: bool) -> Self {
        self.refresh_after_install = enabled;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (empty values are ignored)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = base;
        }
        if let Some(url) = lookup(ENV_AGENT_URL).filter(|v| !v.trim().is_empty()) {
            self.agent_url = url;
        }
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base is empty".to_string()));
        }
        if self.agent_url.trim().is_empty() {
            return Err(ConfigError::Invalid("agent_url is empty".to_string()));
        }
        if self.prerequisite_flag.trim().is_empty() {
            return Err(ConfigError::Invalid("prerequisite_flag is empty".to_string()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ToolshelfConfig::default();
        assert_eq!(config.api_base, "http://localhost:3000");
        assert_eq!(config.agent_url, "http://agent:8889");
        assert_eq!(config.prerequisite_flag, "n8n_enabled");
        assert!(!config.refresh_after_install);
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("TOOLSHELF_API_BASE", "http://ui:3000"),
            ("WEBHOOK_URL", ""),
        ]
        .into_iter()
        .collect();

        let config = ToolshelfConfig::default()
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_base, "http://ui:3000");
        // Empty override is ignored
        assert_eq!(config.agent_url, "http://agent:8889");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ToolshelfConfig =
            serde_yaml::from_str("api_base: http://example:3000\nrefresh_after_install: true\n").unwrap();
        assert_eq!(config.api_base, "http://example:3000");
        assert_eq!(config.agent_url, DEFAULT_AGENT_URL);
        assert!(config.refresh_after_install);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty = ToolshelfConfig::default().with_api_base(" ");
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));

        let zero = ToolshelfConfig::default().with_timeout_secs(0);
        assert!(zero.validate().is_err());
    }
}
