//! Catalog entry types

use serde::{Deserialize, Serialize};

use super::category::ToolCategory;

/// A tool listed in the remote registry
///
/// Entries are immutable once fetched. The registry hands them out as
/// `Arc<ToolIndexEntry>` so the panel can point at the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolIndexEntry {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Category
    pub category: ToolCategory,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Phrases that trigger the tool by voice
    #[serde(default)]
    pub voice_triggers: Vec<String>,
    /// Published version, if the registry reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Author or maintainer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Icon name or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ToolIndexEntry {
    /// Create a new entry with no tags or voice triggers
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            tags: Vec::new(),
            voice_triggers: Vec::new(),
            version: None,
            author: None,
            icon: None,
        }
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the voice triggers
    pub fn with_voice_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.voice_triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Check whether any searchable field contains `needle`
    ///
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
            || self
                .voice_triggers
                .iter()
                .any(|t| t.to_lowercase().contains(needle))
    }
}
