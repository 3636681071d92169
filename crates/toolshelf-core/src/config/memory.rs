//! In-memory configuration provider

use parking_lot::RwLock;

use super::settings::ToolshelfConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// Configuration held in memory
///
/// For hosts that build the config themselves, and for tests.
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<ToolshelfConfig>,
}

impl MemoryConfigProvider {
    /// Create a provider holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `config`
    pub fn with_config(config: ToolshelfConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self) -> ConfigResult<ToolshelfConfig> {
        Ok(self.config.read().clone())
    }

    fn save(&self, config: &ToolshelfConfig) -> ConfigResult<()> {
        config.validate()?;
        *self.config.write() = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_provider() {
        let provider = MemoryConfigProvider::new();
        assert_eq!(provider.load().unwrap(), ToolshelfConfig::default());

        let updated = ToolshelfConfig::default().with_timeout_secs(10);
        provider.save(&updated).unwrap();
        assert_eq!(provider.load().unwrap().request_timeout_secs, Some(10));

        // Invalid config is rejected and the old one kept
        let invalid = ToolshelfConfig::default().with_api_base("");
        assert!(provider.save(&invalid).is_err());
        assert_eq!(provider.load().unwrap(), updated);
    }
}
