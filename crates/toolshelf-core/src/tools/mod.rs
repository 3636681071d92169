//! Tool catalog module
//!
//! This module holds the registry store and the filter engine behind the
//! browse view.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │                                             │
//! │  - Fetches the catalog (wholesale replace)  │
//! │  - Tracks loading / last error              │
//! │  - Holds category + search criteria         │
//! │  - Derives the filtered view on read        │
//! └─────────────────────────────────────────────┘
//!           │
//!           │ CatalogProvider::fetch_catalog
//!           ▼
//! ┌─────────────────────────────────────────────┐
//! │  Registry endpoint (GET /api/tools/registry)│
//! └─────────────────────────────────────────────┘
//! ```

mod filter;
mod registry;

pub use filter::{filter_catalog, ToolFilter};
pub use registry::{RefreshOutcome, RegistrySnapshot, ToolRegistry, REFRESH_FALLBACK_ERROR};
