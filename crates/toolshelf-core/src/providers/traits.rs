//! Collaborator traits
//!
//! The registry, gate and memory proxy only see these traits. `HttpBackend`
//! implements all three against the real endpoints; `MockBackend` scripts
//! replies for tests.

use async_trait::async_trait;
use serde_json::Value;

use super::error::ProviderResult;
use super::response::CatalogResponse;

/// Source of the tool catalog
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full catalog
    async fn fetch_catalog(&self) -> ProviderResult<CatalogResponse>;
}

/// Source of the client settings document
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Fetch the settings payload (`{"settings": {...}}`)
    async fn fetch_settings(&self) -> ProviderResult<Value>;
}

/// Keyed record store behind the memory proxy
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Fetch one entry
    async fn get_memory(&self, key: &str) -> ProviderResult<Value>;

    /// Delete one entry
    async fn delete_memory(&self, key: &str) -> ProviderResult<Value>;

    /// List stored entries
    async fn list_memory(&self) -> ProviderResult<Value>;
}
