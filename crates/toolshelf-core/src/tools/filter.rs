//! Catalog filtering
//!
//! The filtered view is never stored. It is derived from the catalog and a
//! [`ToolFilter`] each time it is read, so it cannot drift from its inputs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{ToolCategory, ToolIndexEntry};

/// Category and free-text criteria for the browse view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFilter {
    /// If set, only entries of this category
    pub category: Option<ToolCategory>,
    /// Free-text query; blank means no text filter
    pub search: String,
}

impl ToolFilter {
    /// A filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one category
    pub fn with_category(mut self, category: ToolCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the search text
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether neither criterion is active
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.trim().is_empty()
    }

    /// Lowercased needle, or `None` when the search text is blank
    ///
    /// Only the blank check trims; a non-blank query is matched as typed.
    fn needle(&self) -> Option<String> {
        if self.search.trim().is_empty() {
            None
        } else {
            Some(self.search.to_lowercase())
        }
    }

    /// Check if an entry passes both criteria
    pub fn matches(&self, tool: &ToolIndexEntry) -> bool {
        if let Some(category) = self.category {
            if tool.category != category {
                return false;
            }
        }

        match self.needle() {
            Some(needle) => tool.matches_query(&needle),
            None => true,
        }
    }

    /// Apply the filter, keeping catalog order
    pub fn apply(&self, catalog: &[Arc<ToolIndexEntry>]) -> Vec<Arc<ToolIndexEntry>> {
        let needle = self.needle();
        catalog
            .iter()
            .filter(|tool| self.category.map_or(true, |c| tool.category == c))
            .filter(|tool| needle.as_deref().map_or(true, |n| tool.matches_query(n)))
            .cloned()
            .collect()
    }
}

/// Derive the filtered view of `catalog`
pub fn filter_catalog(catalog: &[Arc<ToolIndexEntry>], filter: &ToolFilter) -> Vec<Arc<ToolIndexEntry>> {
    filter.apply(catalog)
}
