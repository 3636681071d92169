//! File-based configuration provider (YAML)
//!
//! Supports user-level (~/.config/toolshelf/config.yaml) and workspace-level
//! (.config/toolshelf/config.yaml) config.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::settings::ToolshelfConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/toolshelf/config.yaml)
    User,
    /// Workspace-level config (.config/toolshelf/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based configuration provider
///
/// A missing file reads as the default configuration. Loaded values are
/// cached until [`FileConfigProvider::reload`] or a save.
///
/// # Example
///
/// ```no_run
/// use toolshelf_core::config::{ConfigProvider, FileConfigProvider};
///
/// let config = FileConfigProvider::user().load().unwrap().apply_env();
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<ToolshelfConfig>>,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level config provider (~/.config/toolshelf/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("toolshelf").join("config.yaml"), ConfigLevel::User)
    }

    /// Create a workspace-level config provider (.config/toolshelf/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("toolshelf").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_file(&self) -> ConfigResult<ToolshelfConfig> {
        if !self.path.exists() {
            return Ok(ToolshelfConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ToolshelfConfig::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Reload config from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<ToolshelfConfig> {
        let config = self.read_file()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> ConfigResult<ToolshelfConfig> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }

    fn save(&self, config: &ToolshelfConfig) -> ConfigResult<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(config)?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);

        assert!(!provider.exists());
        assert_eq!(provider.load().unwrap(), ToolshelfConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::workspace(dir.path());
        assert_eq!(provider.level(), ConfigLevel::Workspace);

        let config = ToolshelfConfig::default()
            .with_api_base("http://ui.local:3000")
            .with_refresh_after_install(true);
        provider.save(&config).unwrap();

        assert!(provider.exists());
        let content = fs::read_to_string(provider.path()).unwrap();
        assert!(content.contains("http://ui.local:3000"));

        assert_eq!(provider.reload().unwrap(), config);
    }

    #[test]
    fn test_cache_until_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let provider = FileConfigProvider::new(&path, ConfigLevel::User);

        assert_eq!(provider.load().unwrap().agent_url, "http://agent:8889");

        fs::write(&path, "agent_url: http://other:8889\n").unwrap();
        assert_eq!(provider.load().unwrap().agent_url, "http://agent:8889");
        assert_eq!(provider.reload().unwrap().agent_url, "http://other:8889");
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_base: [unclosed").unwrap();

        let provider = FileConfigProvider::new(&path, ConfigLevel::User);
        assert!(matches!(provider.load(), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);

        let bad = ToolshelfConfig::default().with_agent_url("");
        assert!(matches!(provider.save(&bad), Err(ConfigError::Invalid(_))));
        assert!(!provider.exists());
    }
}
