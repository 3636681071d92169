//! Tools panel orchestration

mod controller;

pub use controller::{
    Activation, ModalState, PanelConfig, PanelController, PanelError, PanelResult,
    PanelSnapshot, PanelView,
};
