//! Toolshelf Core
//!
//! State and derivation logic behind the tools panel: the registry of
//! installable tools, its category/search filter, the install prerequisite
//! gate and the panel controller that ties them together. Rendering is left
//! to the host; this crate only holds state and talks to the backend through
//! the traits in [`providers`].
//!
//! ## Panel lifecycle
//!
//! ```rust,ignore
//! use toolshelf_core::{HttpBackend, PanelController, ConsoleLogger};
//! use toolshelf_core::config::{ConfigProvider, FileConfigProvider};
//!
//! let config = FileConfigProvider::user().load()?.apply_env();
//! let logger = Arc::new(ConsoleLogger::new());
//! let backend = Arc::new(HttpBackend::from_config(&config, logger.clone())?);
//!
//! // Mount
//! let panel = PanelController::mount(backend, &config, logger);
//!
//! // Open: refreshes the catalog and checks the prerequisite concurrently
//! panel.open().await;
//!
//! panel.registry().set_search("weather");
//! let visible = panel.registry().filtered_tools();
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod providers;
pub mod tools;
pub mod gate;
pub mod panel;
pub mod memory;

// Re-export commonly used types
pub use types::{ToolCategory, ToolIndexEntry, CategoryParseError};

pub use logging::{Logger, LogLevel, NoOpLogger, ConsoleLogger, MemoryLogger};

pub use config::{ConfigProvider, ConfigError, ToolshelfConfig, FileConfigProvider, MemoryConfigProvider};

pub use providers::{
    CatalogProvider, SettingsProvider, MemoryBackend,
    ProviderError, ProviderResult, CatalogResponse,
    HttpBackend, MockBackend, MockReply,
};

pub use tools::{ToolRegistry, ToolFilter, RefreshOutcome, RegistrySnapshot, filter_catalog};

pub use gate::{PrerequisiteGate, PrerequisiteStatus};

pub use panel::{PanelController, PanelConfig, PanelView, ModalState, PanelError, Activation};

pub use memory::{MemoryProxy, ProxyResponse};
