//! Install prerequisite check
//!
//! Tools can only be installed when an external automation integration is
//! enabled in the client settings. The gate asks the settings backend once
//! per panel activation and caches a tri-state answer.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::config::DEFAULT_PREREQUISITE_FLAG;
use crate::logging::Logger;
use crate::providers::SettingsProvider;

/// Result of the prerequisite check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrerequisiteStatus {
    /// Not checked yet, or a check is pending since the last reset
    #[default]
    Unknown,
    Enabled,
    /// Explicitly off, missing, or the check failed
    Disabled,
}

#[derive(Debug, Default)]
struct GateState {
    status: PrerequisiteStatus,
    in_flight: bool,
    latest: u64,
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read `settings.<flag>` from a settings payload
pub fn settings_flag(payload: &Value, flag: &str) -> bool {
    payload
        .get("settings")
        .and_then(|settings| settings.get(flag))
        .map_or(false, is_truthy)
}

/// Gate deciding whether installs are currently allowed
pub struct PrerequisiteGate {
    provider: Arc<dyn SettingsProvider>,
    flag: String,
    state: RwLock<GateState>,
    logger: Arc<dyn Logger>,
}

impl PrerequisiteGate {
    /// Create a gate reading the default flag
    pub fn new(provider: Arc<dyn SettingsProvider>, logger: Arc<dyn Logger>) -> Self {
        Self::with_flag(provider, DEFAULT_PREREQUISITE_FLAG, logger)
    }

    /// Create a gate reading `settings.<flag>`
    pub fn with_flag(
        provider: Arc<dyn SettingsProvider>,
        flag: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            flag: flag.into(),
            state: RwLock::new(GateState::default()),
            logger,
        }
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Query the settings backend and record the answer
    ///
    /// Failures are reported as [`PrerequisiteStatus::Disabled`], never as
    /// errors. A check overtaken by a newer one leaves the state alone.
    pub async fn check(&self) -> PrerequisiteStatus {
        let generation = {
            let mut state = self.state.write();
            state.latest += 1;
            state.in_flight = true;
            state.latest
        };

        let result = self.provider.fetch_settings().await;

        let status = match result {
            Ok(payload) => {
                if settings_flag(&payload, &self.flag) {
                    PrerequisiteStatus::Enabled
                } else {
                    PrerequisiteStatus::Disabled
                }
            }
            Err(e) => {
                crate::log_warn!(
                    self.logger,
                    "[PrerequisiteGate] Settings check failed, treating {} as disabled: {}",
                    self.flag,
                    e
                );
                PrerequisiteStatus::Disabled
            }
        };

        let mut state = self.state.write();
        if state.latest != generation {
            crate::log_debug!(
                self.logger,
                "[PrerequisiteGate] Discarding check #{} (latest is #{})",
                generation,
                state.latest
            );
            return state.status;
        }
        state.status = status;
        state.in_flight = false;
        crate::log_debug!(self.logger, "[PrerequisiteGate] {} is {:?}", self.flag, status);
        status
    }

    /// Forget the last answer
    pub fn reset(&self) {
        self.state.write().status = PrerequisiteStatus::Unknown;
    }

    pub fn status(&self) -> PrerequisiteStatus {
        self.state.read().status
    }

    /// Whether a check is currently running
    pub fn is_checking(&self) -> bool {
        self.state.read().in_flight
    }

    /// Installs are allowed only after a successful check said so
    pub fn can_install(&self) -> bool {
        self.status() == PrerequisiteStatus::Enabled
    }
}

impl std::fmt::Debug for PrerequisiteGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("PrerequisiteGate")
            .field("flag", &self.flag)
            .field("status", &state.status)
            .field("in_flight", &state.in_flight)
            .finish()
    }
}
