//! Core types shared by the registry, gate and panel
//!
//! This module contains the catalog data model.

mod category;
mod tool;

pub use category::{CategoryParseError, ToolCategory};
pub use tool::ToolIndexEntry;
