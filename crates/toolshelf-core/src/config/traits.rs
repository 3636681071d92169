//! Configuration source trait

use super::settings::ToolshelfConfig;

/// Where the client configuration comes from
///
/// Implementations:
/// - `MemoryConfigProvider`: Config handed in by the host, or by tests
/// - `FileConfigProvider`: YAML file (~/.config/toolshelf/config.yaml)
pub trait ConfigProvider: Send + Sync {
    /// Load the current configuration
    fn load(&self) -> ConfigResult<ToolshelfConfig>;

    /// Persist a configuration
    fn save(&self, config: &ToolshelfConfig) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
