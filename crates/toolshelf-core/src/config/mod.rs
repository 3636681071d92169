//! Client configuration
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory, handed in by the host
//! - `FileConfigProvider`: YAML file-based (user/workspace level)

mod traits;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{
    ToolshelfConfig, DEFAULT_AGENT_URL, DEFAULT_API_BASE, DEFAULT_PREREQUISITE_FLAG,
    ENV_AGENT_URL, ENV_API_BASE,
};
pub use memory::MemoryConfigProvider;
pub use file::{FileConfigProvider, ConfigLevel};
