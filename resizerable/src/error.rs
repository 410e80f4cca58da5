use resizerable_proto::{Action, WindowId};
use thiserror::Error;

/// A host call failed (the host raised instead of returning).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResizerError {
    #[error("settings store unavailable: {0}")]
    SettingsUnavailable(HostError),

    #[error("host declined {action} binding for {accelerator:?}")]
    BindingAddFailure { action: Action, accelerator: String },

    #[error("keybinding setup failed: {0}")]
    BindingSetup(HostError),

    #[error("monitor for window {0} could not be resolved")]
    MissingMonitor(WindowId),

    #[error("window {0} is not usable")]
    InvalidWindow(WindowId),

    #[error("failed to disconnect observer for window {window}: {source}")]
    ObserverTeardown { window: WindowId, source: HostError },

    #[error("host call failed: {0}")]
    Host(#[from] HostError),
}

pub type Result<T> = std::result::Result<T, ResizerError>;
