//! Tools panel controller
//!
//! Coordinates the view tabs, the modal slot and panel activation. It owns
//! no catalog data: modals point at entries the registry already holds.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::config::ToolshelfConfig;
use crate::gate::{PrerequisiteGate, PrerequisiteStatus};
use crate::logging::Logger;
use crate::providers::{CatalogProvider, SettingsProvider};
use crate::tools::{RefreshOutcome, ToolRegistry};
use crate::types::ToolIndexEntry;

/// Top-level tab of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelView {
    #[default]
    Browse,
    Installed,
}

/// The single modal slot
///
/// Detail and install never show together; one variant replaces the other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "tool", rename_all = "lowercase")]
pub enum ModalState {
    #[default]
    None,
    Detail(Arc<ToolIndexEntry>),
    Installing(Arc<ToolIndexEntry>),
}

impl ModalState {
    /// Tool shown in the detail modal
    pub fn detail_tool(&self) -> Option<&Arc<ToolIndexEntry>> {
        match self {
            ModalState::Detail(tool) => Some(tool),
            _ => None,
        }
    }

    /// Tool being installed
    pub fn install_tool(&self) -> Option<&Arc<ToolIndexEntry>> {
        match self {
            ModalState::Installing(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ModalState::None)
    }
}

/// Errors from panel actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("Install is not available (prerequisite is {0:?})")]
    PrerequisiteNotMet(PrerequisiteStatus),

    #[error("No tool detail is open")]
    NoDetailOpen,
}

pub type PanelResult<T> = Result<T, PanelError>;

/// Panel policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelConfig {
    /// Re-fetch the catalog after an install finishes
    pub refresh_after_install: bool,
}

impl From<&ToolshelfConfig> for PanelConfig {
    fn from(config: &ToolshelfConfig) -> Self {
        Self {
            refresh_after_install: config.refresh_after_install,
        }
    }
}

/// What activation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub refresh: RefreshOutcome,
    pub prerequisite: PrerequisiteStatus,
}

/// Everything the panel chrome renders, read at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub is_open: bool,
    pub view: PanelView,
    pub modal: ModalState,
    pub prerequisite: PrerequisiteStatus,
    pub checking_prerequisite: bool,
}

#[derive(Debug, Default)]
struct PanelState {
    is_open: bool,
    view: PanelView,
    modal: ModalState,
}

/// Controller for one mounted tools panel
///
/// Build one when the panel mounts and drop it on unmount.
pub struct PanelController {
    registry: Arc<ToolRegistry>,
    gate: Arc<PrerequisiteGate>,
    config: PanelConfig,
    state: RwLock<PanelState>,
    logger: Arc<dyn Logger>,
}

impl PanelController {
    pub fn new(
        registry: Arc<ToolRegistry>,
        gate: Arc<PrerequisiteGate>,
        config: PanelConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            registry,
            gate,
            config,
            state: RwLock::new(PanelState::default()),
            logger,
        }
    }

    /// Build the registry, gate and controller over one backend
    pub fn mount<B>(backend: Arc<B>, config: &ToolshelfConfig, logger: Arc<dyn Logger>) -> Self
    where
        B: CatalogProvider + SettingsProvider + 'static,
    {
        let registry = Arc::new(ToolRegistry::new(backend.clone(), logger.clone()));
        let gate = Arc::new(PrerequisiteGate::with_flag(
            backend,
            config.prerequisite_flag.clone(),
            logger.clone(),
        ));
        Self::new(registry, gate, PanelConfig::from(config), logger)
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn gate(&self) -> &Arc<PrerequisiteGate> {
        &self.gate
    }

    /// Show or hide the panel
    ///
    /// Opening a closed panel resets the prerequisite status and runs the
    /// catalog refresh and the prerequisite check concurrently, returning
    /// once both finish. Any other call only records visibility.
    pub async fn set_open(&self, open: bool) -> Option<Activation> {
        if open {
            self.open().await
        } else {
            self.close();
            None
        }
    }

    /// Open the panel; see [`PanelController::set_open`]
    pub async fn open(&self) -> Option<Activation> {
        {
            let mut state = self.state.write();
            if state.is_open {
                return None;
            }
            state.is_open = true;
        }

        crate::log_info!(self.logger, "[PanelController] Panel opened, loading registry");
        self.gate.reset();
        let (refresh, prerequisite) = futures::join!(self.registry.refresh(), self.gate.check());
        Some(Activation { refresh, prerequisite })
    }

    /// Hide the panel. Nothing else is cleared.
    pub fn close(&self) {
        self.state.write().is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.state.read().is_open
    }

    /// Switch tabs
    pub fn set_view(&self, view: PanelView) {
        self.state.write().view = view;
    }

    pub fn view(&self) -> PanelView {
        self.state.read().view
    }

    pub fn modal(&self) -> ModalState {
        self.state.read().modal.clone()
    }

    /// Open the detail modal for a tool card
    ///
    /// Ignored while an install flow is open.
    pub fn select_tool(&self, tool: Arc<ToolIndexEntry>) {
        let mut state = self.state.write();
        if let ModalState::Installing(current) = &state.modal {
            crate::log_debug!(
                self.logger,
                "[PanelController] Ignoring selection of {} while installing {}",
                tool.id,
                current.id
            );
            return;
        }
        state.modal = ModalState::Detail(tool);
    }

    /// Start installing a tool, closing the detail modal if one is open
    pub fn start_install(&self, tool: Arc<ToolIndexEntry>) -> PanelResult<()> {
        let prerequisite = self.gate.status();
        if prerequisite != PrerequisiteStatus::Enabled {
            crate::log_warn!(
                self.logger,
                "[PanelController] Refusing to install {}: prerequisite is {:?}",
                tool.id,
                prerequisite
            );
            return Err(PanelError::PrerequisiteNotMet(prerequisite));
        }

        crate::log_info!(self.logger, "[PanelController] Installing {}", tool.id);
        self.state.write().modal = ModalState::Installing(tool);
        Ok(())
    }

    /// Install the tool shown in the detail modal
    pub fn start_install_from_detail(&self) -> PanelResult<()> {
        let tool = self
            .state
            .read()
            .modal
            .detail_tool()
            .cloned()
            .ok_or(PanelError::NoDetailOpen)?;
        self.start_install(tool)
    }

    /// Close the detail modal; an install flow is left alone
    pub fn close_detail(&self) {
        let mut state = self.state.write();
        if matches!(state.modal, ModalState::Detail(_)) {
            state.modal = ModalState::None;
        }
    }

    /// Close the install flow; a detail modal is left alone
    pub fn close_install(&self) {
        let mut state = self.state.write();
        if matches!(state.modal, ModalState::Installing(_)) {
            state.modal = ModalState::None;
        }
    }

    /// The install flow finished successfully
    ///
    /// Closes the install flow and, when configured, refreshes the catalog.
    pub async fn install_complete(&self) -> Option<RefreshOutcome> {
        let finished = self.state.read().modal.install_tool().map(|t| t.id.clone());
        if let Some(id) = finished {
            crate::log_info!(self.logger, "[PanelController] Installed {}", id);
        }
        self.close_install();

        if self.config.refresh_after_install {
            Some(self.registry.refresh().await)
        } else {
            None
        }
    }

    /// Search and category controls only show on the browse tab
    pub fn shows_filters(&self) -> bool {
        self.view() == PanelView::Browse
    }

    /// Whether the "integration not configured" banner should show
    pub fn show_prerequisite_warning(&self) -> bool {
        self.view() == PanelView::Browse
            && !self.gate.is_checking()
            && self.gate.status() == PrerequisiteStatus::Disabled
    }

    pub fn can_install(&self) -> bool {
        self.gate.can_install()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let state = self.state.read();
        PanelSnapshot {
            is_open: state.is_open,
            view: state.view,
            modal: state.modal.clone(),
            prerequisite: self.gate.status(),
            checking_prerequisite: self.gate.is_checking(),
        }
    }
}

impl std::fmt::Debug for PanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("PanelController")
            .field("is_open", &state.is_open)
            .field("view", &state.view)
            .field("modal", &state.modal)
            .field("config", &self.config)
            .finish()
    }
}
