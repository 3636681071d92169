//! Tool registry store
//!
//! The ToolRegistry owns:
//! - The catalog fetched from the registry endpoint
//! - Loading and error status of the last refresh
//! - The category and search criteria of the browse view
//!
//! The filtered view is derived on read from these three inputs.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use super::filter::ToolFilter;
use crate::logging::Logger;
use crate::providers::CatalogProvider;
use crate::types::{ToolCategory, ToolIndexEntry};

/// Message shown when the backend fails without saying why
pub const REFRESH_FALLBACK_ERROR: &str = "Failed to fetch registry";

/// What a call to [`ToolRegistry::refresh`] ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Catalog replaced with this many entries
    Loaded(usize),
    /// Catalog kept, error recorded
    Failed(String),
    /// A newer refresh was issued before this one completed; nothing applied
    Superseded,
}

/// Point-in-time copy of the registry for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    /// Filtered view, in catalog order
    pub tools: Vec<Arc<ToolIndexEntry>>,
    /// Size of the full catalog
    pub total: usize,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub category: Option<ToolCategory>,
    pub search: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    catalog: Vec<Arc<ToolIndexEntry>>,
    is_loading: bool,
    last_error: Option<String>,
    filter: ToolFilter,
    /// Generation of the most recently issued refresh
    latest: u64,
}

/// Registry of installable tools
pub struct ToolRegistry {
    provider: Arc<dyn CatalogProvider>,
    state: RwLock<RegistryState>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry backed by `provider`
    pub fn new(provider: Arc<dyn CatalogProvider>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider,
            state: RwLock::new(RegistryState::default()),
            logger,
        }
    }

    /// Fetch the catalog and replace the cached one
    ///
    /// Overlapping calls are allowed. Only the most recently issued call may
    /// write its result; earlier ones complete as [`RefreshOutcome::Superseded`]
    /// without touching any state, and `is_loading` stays set until the latest
    /// call lands.
    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = {
            let mut state = self.state.write();
            state.latest += 1;
            state.is_loading = true;
            state.last_error = None;
            state.latest
        };

        let result = self.provider.fetch_catalog().await;

        let mut state = self.state.write();
        if state.latest != generation {
            crate::log_debug!(
                self.logger,
                "[ToolRegistry] Discarding refresh #{} (latest is #{})",
                generation,
                state.latest
            );
            return RefreshOutcome::Superseded;
        }

        state.is_loading = false;
        match result {
            Ok(response) => {
                for reason in &response.skipped {
                    crate::log_warn!(self.logger, "[ToolRegistry] Skipping catalog {}", reason);
                }
                let tools: Vec<Arc<ToolIndexEntry>> =
                    response.into_tools().into_iter().map(Arc::new).collect();
                let count = tools.len();
                state.catalog = tools;
                state.last_error = None;
                crate::log_info!(self.logger, "[ToolRegistry] Loaded {} tools", count);
                RefreshOutcome::Loaded(count)
            }
            Err(e) => {
                let message = e.user_message(REFRESH_FALLBACK_ERROR);
                crate::log_error!(self.logger, "[ToolRegistry] Error: {}", e);
                state.last_error = Some(message.clone());
                RefreshOutcome::Failed(message)
            }
        }
    }

    /// Set or clear the category filter
    pub fn set_category(&self, category: Option<ToolCategory>) {
        self.state.write().filter.category = category;
    }

    /// Set the search text; blank text clears the search
    pub fn set_search(&self, search: impl Into<String>) {
        self.state.write().filter.search = search.into();
    }

    pub fn clear_search(&self) {
        self.state.write().filter.search.clear();
    }

    /// Clear both criteria
    pub fn clear_filters(&self) {
        self.state.write().filter = ToolFilter::default();
    }

    /// Current criteria
    pub fn filter(&self) -> ToolFilter {
        self.state.read().filter.clone()
    }

    pub fn category(&self) -> Option<ToolCategory> {
        self.state.read().filter.category
    }

    pub fn search(&self) -> String {
        self.state.read().filter.search.clone()
    }

    /// Entries passing the current criteria, in catalog order
    pub fn filtered_tools(&self) -> Vec<Arc<ToolIndexEntry>> {
        let state = self.state.read();
        state.filter.apply(&state.catalog)
    }

    /// The full catalog
    pub fn tools(&self) -> Vec<Arc<ToolIndexEntry>> {
        self.state.read().catalog.clone()
    }

    /// Look up a catalog entry by id
    pub fn find(&self, id: &str) -> Option<Arc<ToolIndexEntry>> {
        self.state.read().catalog.iter().find(|t| t.id == id).cloned()
    }

    pub fn tool_count(&self) -> usize {
        self.state.read().catalog.len()
    }

    pub fn filtered_count(&self) -> usize {
        let state = self.state.read();
        state.catalog.iter().filter(|t| state.filter.matches(t)).count()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    /// Number of catalog entries per category, in filter bar order
    pub fn category_counts(&self) -> Vec<(ToolCategory, usize)> {
        let state = self.state.read();
        ToolCategory::ALL
            .iter()
            .map(|&c| (c, state.catalog.iter().filter(|t| t.category == c).count()))
            .collect()
    }

    /// Copy everything the browse view renders in one consistent read
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        RegistrySnapshot {
            tools: state.filter.apply(&state.catalog),
            total: state.catalog.len(),
            is_loading: state.is_loading,
            last_error: state.last_error.clone(),
            category: state.filter.category,
            search: state.filter.search.clone(),
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ToolRegistry")
            .field("tools", &state.catalog.len())
            .field("is_loading", &state.is_loading)
            .field("last_error", &state.last_error)
            .field("filter", &state.filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::providers::{MockBackend, MockReply};
    use serde_json::json;

    fn weather() -> ToolIndexEntry {
        ToolIndexEntry::new("weather", "Weather", "Current conditions", ToolCategory::Utility)
            .with_tags(["forecast"])
            .with_voice_triggers(["what's the weather"])
    }

    fn timer() -> ToolIndexEntry {
        ToolIndexEntry::new("timer", "Timer", "Countdowns", ToolCategory::Utility)
            .with_voice_triggers(["set a timer"])
    }

    fn plex() -> ToolIndexEntry {
        ToolIndexEntry::new("plex", "Plex", "Media server", ToolCategory::Media)
    }

    fn registry(backend: &Arc<MockBackend>) -> ToolRegistry {
        ToolRegistry::new(backend.clone(), Arc::new(NoOpLogger::new()))
    }

    #[tokio::test]
    async fn test_refresh_loads_catalog() {
        let backend = Arc::new(MockBackend::with_catalog(&[weather(), timer()]));
        let registry = registry(&backend);

        assert_eq!(registry.refresh().await, RefreshOutcome::Loaded(2));
        assert_eq!(registry.tool_count(), 2);
        assert!(!registry.is_loading());
        assert!(registry.last_error().is_none());
        assert_eq!(registry.find("timer").map(|t| t.name.clone()), Some("Timer".to_string()));
    }

    #[tokio::test]
    async fn test_filter_weather_in_utility() {
        let backend = Arc::new(MockBackend::with_catalog(&[weather(), timer()]));
        let registry = registry(&backend);
        registry.refresh().await;

        registry.set_category(Some(ToolCategory::Utility));
        registry.set_search("weather");

        let view = registry.filtered_tools();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Weather");
        assert_eq!(registry.filtered_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_entry_does_not_fail_refresh() {
        let backend = Arc::new(MockBackend::new());
        backend.push_catalog(MockReply::json(
            200,
            json!({ "tools": [
                serde_json::to_value(weather()).unwrap(),
                { "name": "Broken", "category": "media" },
            ]}),
        ));
        let logger = Arc::new(MemoryLogger::new());
        let registry = ToolRegistry::new(backend.clone(), logger.clone());

        assert_eq!(registry.refresh().await, RefreshOutcome::Loaded(1));
        assert!(registry.last_error().is_none());
        assert!(registry.find("weather").is_some());

        let warnings = logger.at_level(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Skipping catalog entry 1"));
    }

    #[tokio::test]
    async fn test_refresh_without_tools_field() {
        let backend = Arc::new(MockBackend::new());
        backend.set_catalog(MockReply::json(200, json!({})));
        let registry = registry(&backend);

        assert_eq!(registry.refresh().await, RefreshOutcome::Loaded(0));
        assert!(registry.tools().is_empty());
        assert!(registry.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_catalog() {
        let backend = Arc::new(MockBackend::with_catalog(&[weather(), timer()]));
        let registry = registry(&backend);
        registry.refresh().await;

        backend.push_catalog(MockReply::json(503, json!({ "error": "Registry offline" })));
        let outcome = registry.refresh().await;

        assert_eq!(outcome, RefreshOutcome::Failed("Registry offline".to_string()));
        assert_eq!(registry.last_error().as_deref(), Some("Registry offline"));
        assert_eq!(registry.tool_count(), 2);
        assert!(!registry.is_loading());
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let backend = Arc::new(MockBackend::new());
        let registry = registry(&backend);

        backend.push_catalog(MockReply::text(500, "Internal Server Error"));
        assert_eq!(
            registry.refresh().await,
            RefreshOutcome::Failed(REFRESH_FALLBACK_ERROR.to_string())
        );

        backend.push_catalog(MockReply::transport("Failed to fetch"));
        assert_eq!(registry.refresh().await, RefreshOutcome::Failed("Failed to fetch".to_string()));
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let backend = Arc::new(MockBackend::with_catalog(&[plex()]));
        let registry = registry(&backend);

        backend.push_catalog(MockReply::transport("offline"));
        registry.refresh().await;
        assert!(registry.last_error().is_some());

        registry.refresh().await;
        assert!(registry.last_error().is_none());
        assert_eq!(registry.tool_count(), 1);
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let backend = Arc::new(MockBackend::new());
        let release = backend.defer_catalog();
        let registry = registry(&backend);

        let refresh = registry.refresh();
        let check = async {
            assert!(registry.is_loading());
            release.send(MockReply::catalog(&[plex()])).unwrap();
        };
        let (outcome, ()) = futures::join!(refresh, check);

        assert_eq!(outcome, RefreshOutcome::Loaded(1));
        assert!(!registry.is_loading());
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let backend = Arc::new(MockBackend::new());
        let first = backend.defer_catalog();
        let second = backend.defer_catalog();
        let logger = Arc::new(MemoryLogger::new());
        let registry = ToolRegistry::new(backend.clone(), logger.clone());

        let older = registry.refresh();
        let newer = registry.refresh();
        let driver = async {
            // Newer request completes first, then the older one
            second.send(MockReply::catalog(&[weather(), timer()])).unwrap();
            first.send(MockReply::catalog(&[plex()])).unwrap();
        };
        let (older, newer, ()) = futures::join!(older, newer, driver);

        assert_eq!(newer, RefreshOutcome::Loaded(2));
        assert_eq!(older, RefreshOutcome::Superseded);
        assert_eq!(registry.tool_count(), 2);
        assert!(registry.find("plex").is_none());
        assert!(!logger.at_level(LogLevel::Debug).is_empty());
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_set_error() {
        let backend = Arc::new(MockBackend::new());
        let first = backend.defer_catalog();
        let second = backend.defer_catalog();
        let registry = registry(&backend);

        let older = registry.refresh();
        let newer = registry.refresh();
        let driver = async {
            first.send(MockReply::transport("timed out")).unwrap();
            second.send(MockReply::catalog(&[plex()])).unwrap();
        };
        let (older, newer, ()) = futures::join!(older, newer, driver);

        assert_eq!(older, RefreshOutcome::Superseded);
        assert_eq!(newer, RefreshOutcome::Loaded(1));
        assert!(registry.last_error().is_none());
    }

    #[tokio::test]
    async fn test_setters_do_not_fetch() {
        let backend = Arc::new(MockBackend::with_catalog(&[weather(), timer(), plex()]));
        let registry = registry(&backend);
        registry.refresh().await;

        registry.set_category(Some(ToolCategory::Media));
        registry.set_search("plex");
        assert_eq!(registry.filtered_tools().len(), 1);

        registry.clear_search();
        assert_eq!(registry.search(), "");
        registry.set_category(None);
        assert_eq!(registry.filtered_tools().len(), 3);

        registry.set_search("timer");
        registry.clear_filters();
        assert!(registry.filter().is_empty());
        assert_eq!(backend.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn test_category_counts_and_snapshot() {
        let backend = Arc::new(MockBackend::with_catalog(&[weather(), timer(), plex()]));
        let registry = registry(&backend);
        registry.refresh().await;
        registry.set_category(Some(ToolCategory::Utility));

        let counts = registry.category_counts();
        assert_eq!(counts.len(), ToolCategory::ALL.len());
        assert!(counts.contains(&(ToolCategory::Utility, 2)));
        assert!(counts.contains(&(ToolCategory::Media, 1)));
        assert!(counts.contains(&(ToolCategory::Sports, 0)));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.tools.len(), 2);
        assert_eq!(snapshot.category, Some(ToolCategory::Utility));
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_filtered_view_is_stable() {
        let backend = Arc::new(MockBackend::with_catalog(&[weather(), timer(), plex()]));
        let registry = registry(&backend);
        registry.refresh().await;
        registry.set_search("e");

        assert_eq!(registry.filtered_tools(), registry.filtered_tools());
    }
}
