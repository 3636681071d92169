//! Install prerequisite gate

mod prerequisite;

pub use prerequisite::{is_truthy, settings_flag, PrerequisiteGate, PrerequisiteStatus};
