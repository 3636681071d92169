//! Tool categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a catalog entry
///
/// The set is closed. Payloads carrying a category outside of it are read as
/// [`ToolCategory::Other`] so one odd entry never fails the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCategory {
    SmartHome,
    Media,
    Homelab,
    Productivity,
    Developer,
    Utility,
    Sports,
    Social,
    #[serde(other)]
    Other,
}

/// Error returned when a string is not a known category name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool category: {0}")]
pub struct CategoryParseError(pub String);

impl ToolCategory {
    /// All categories, in the order the filter bar shows them
    pub const ALL: [ToolCategory; 9] = [
        ToolCategory::SmartHome,
        ToolCategory::Media,
        ToolCategory::Homelab,
        ToolCategory::Productivity,
        ToolCategory::Developer,
        ToolCategory::Utility,
        ToolCategory::Sports,
        ToolCategory::Social,
        ToolCategory::Other,
    ];

    /// Wire name, as it appears in catalog payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::SmartHome => "smart-home",
            ToolCategory::Media => "media",
            ToolCategory::Homelab => "homelab",
            ToolCategory::Productivity => "productivity",
            ToolCategory::Developer => "developer",
            ToolCategory::Utility => "utility",
            ToolCategory::Sports => "sports",
            ToolCategory::Social => "social",
            ToolCategory::Other => "other",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            ToolCategory::SmartHome => "Smart Home",
            ToolCategory::Media => "Media",
            ToolCategory::Homelab => "Homelab",
            ToolCategory::Productivity => "Productivity",
            ToolCategory::Developer => "Developer",
            ToolCategory::Utility => "Utilities",
            ToolCategory::Sports => "Sports",
            ToolCategory::Social => "Social",
            ToolCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&ToolCategory::SmartHome).unwrap();
        assert_eq!(json, "\"smart-home\"");

        let parsed: ToolCategory = serde_json::from_str("\"utility\"").unwrap();
        assert_eq!(parsed, ToolCategory::Utility);
    }

    #[test]
    fn test_unknown_category_reads_as_other() {
        let parsed: ToolCategory = serde_json::from_str("\"astrology\"").unwrap();
        assert_eq!(parsed, ToolCategory::Other);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("media".parse::<ToolCategory>(), Ok(ToolCategory::Media));
        assert_eq!(
            "Media".parse::<ToolCategory>(),
            Err(CategoryParseError("Media".to_string()))
        );
    }

    #[test]
    fn test_all_is_complete_and_labelled() {
        for category in ToolCategory::ALL {
            assert_eq!(category.as_str().parse::<ToolCategory>(), Ok(category));
            assert!(!category.label().is_empty());
        }
    }
}
