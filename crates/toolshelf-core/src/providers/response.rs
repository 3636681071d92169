//! Response interpretation shared by every transport
//!
//! Transports hand over the raw status and body; these functions decide
//! what counts as success and how failure text is extracted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ProviderError, ProviderResult};
use crate::types::ToolIndexEntry;

/// Body of a successful catalog response
///
/// A missing or null `tools` field means an empty catalog. Entries are read
/// one at a time; an entry that does not parse is left out and its reason
/// kept in `skipped`, so one malformed record never fails the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCatalog")]
pub struct CatalogResponse {
    pub tools: Option<Vec<ToolIndexEntry>>,
    /// Why each dropped entry was dropped
    #[serde(skip_serializing)]
    pub skipped: Vec<String>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    tools: Option<Vec<Value>>,
}

impl From<RawCatalog> for CatalogResponse {
    fn from(raw: RawCatalog) -> Self {
        let Some(entries) = raw.tools else {
            return Self::default();
        };

        let mut tools = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<ToolIndexEntry>(entry) {
                Ok(tool) => tools.push(tool),
                Err(e) => skipped.push(format!("entry {}: {}", index, e)),
            }
        }
        Self {
            tools: Some(tools),
            skipped,
        }
    }
}

impl CatalogResponse {
    pub fn new(tools: Vec<ToolIndexEntry>) -> Self {
        Self {
            tools: Some(tools),
            skipped: Vec::new(),
        }
    }

    /// The catalog, empty when the backend sent none
    pub fn into_tools(self) -> Vec<ToolIndexEntry> {
        self.tools.unwrap_or_default()
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Structured `error` field of a JSON body, if there is one
pub fn error_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

/// Interpret a catalog reply
pub fn catalog_reply(status: u16, body: &str) -> ProviderResult<CatalogResponse> {
    if !is_success(status) {
        return Err(ProviderError::api(status, error_field(body)));
    }
    if body.trim().is_empty() {
        return Ok(CatalogResponse::default());
    }
    Ok(serde_json::from_str(body)?)
}

/// Interpret a settings reply
pub fn settings_reply(status: u16, body: &str) -> ProviderResult<Value> {
    if !is_success(status) {
        return Err(ProviderError::api(status, error_field(body)));
    }
    Ok(serde_json::from_str(body)?)
}

/// Interpret a pass-through reply
///
/// On failure the raw body text travels as the message, as the proxy
/// forwards it unchanged.
pub fn passthrough_reply(status: u16, body: &str) -> ProviderResult<Value> {
    if !is_success(status) {
        let message = Some(body.to_string()).filter(|b| !b.is_empty());
        return Err(ProviderError::api(status, message));
    }
    Ok(serde_json::from_str(body)?)
}
