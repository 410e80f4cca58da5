use serde::{Deserialize, Serialize};

use crate::{Action, Rect, WindowId};

/// Event filter for selecting observability event categories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Window tracking events (tracked, untracked)
    #[serde(default)]
    pub window: bool,
    /// Keybinding events (added, failed, removed, reset)
    #[serde(default)]
    pub binding: bool,
    /// Minimize and resize decisions
    #[serde(default)]
    pub minimize: bool,
    /// Enable and disable
    #[serde(default)]
    pub lifecycle: bool,
}

impl EventFilter {
    /// Create a filter that selects all events
    pub fn all() -> Self {
        Self {
            window: true,
            binding: true,
            minimize: true,
            lifecycle: true,
        }
    }

    /// Parse a comma separated list of category names.
    pub fn from_names(names: &str) -> Result<Self, String> {
        let mut filter = Self::default();
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name {
                "window" => filter.window = true,
                "binding" => filter.binding = true,
                "minimize" => filter.minimize = true,
                "lifecycle" => filter.lifecycle = true,
                "all" => filter = Self::all(),
                other => return Err(format!("Unknown event category: {}", other)),
            }
        }
        Ok(filter)
    }

    /// Check if the filter matches a given event
    pub fn matches(&self, event: &ResizerEvent) -> bool {
        match event {
            ResizerEvent::WindowTracked { .. } | ResizerEvent::WindowUntracked { .. } => {
                self.window
            }
            ResizerEvent::BindingAdded { .. }
            | ResizerEvent::BindingFailed { .. }
            | ResizerEvent::BindingsRemoved
            | ResizerEvent::BindingsReset { .. } => self.binding,
            ResizerEvent::MinimizeVetoed { .. }
            | ResizerEvent::MinimizeAllowed { .. }
            | ResizerEvent::WindowResized { .. }
            | ResizerEvent::WindowMinimized { .. }
            | ResizerEvent::WindowMaximized { .. } => self.minimize,
            ResizerEvent::Enabled { .. } | ResizerEvent::Disabled => self.lifecycle,
        }
    }

    /// Check if any filter is set
    pub fn any(&self) -> bool {
        self.window || self.binding || self.minimize || self.lifecycle
    }

    /// Get the effective filter (all if none specified)
    pub fn effective(self) -> Self {
        if self.any() {
            self
        } else {
            Self::all()
        }
    }
}

/// Structured events emitted by the engine as it reacts to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResizerEvent {
    // Lifecycle
    Enabled {
        tracked_windows: usize,
    },
    Disabled,

    // Window tracking
    WindowTracked {
        window_id: WindowId,
    },
    WindowUntracked {
        window_id: WindowId,
    },

    // Keybindings
    BindingAdded {
        action: Action,
        accelerator: String,
    },
    BindingFailed {
        action: Action,
        accelerator: String,
    },
    BindingsRemoved,
    BindingsReset {
        reason: String,
    },

    // Decisions
    MinimizeVetoed {
        window_id: WindowId,
        current_area: u64,
        target_area: u64,
    },
    MinimizeAllowed {
        window_id: WindowId,
        current_area: u64,
        target_area: u64,
    },
    WindowResized {
        window_id: WindowId,
        target: Rect,
    },
    WindowMinimized {
        window_id: WindowId,
    },
    WindowMaximized {
        window_id: WindowId,
    },
}
