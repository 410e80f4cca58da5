use serde::{Deserialize, Serialize};

/// Settings keys of the external schema, consumed verbatim.
pub mod keys {
    pub const MARGIN_LEFT: &str = "margin-left";
    pub const MARGIN_RIGHT: &str = "margin-right";
    pub const MARGIN_TOP: &str = "margin-top";
    pub const MARGIN_BOTTOM: &str = "margin-bottom";
    pub const SMART_MINIMIZE: &str = "smart-minimize";

    pub const KEY_MAXIMIZE: &str = "key-maximize";
    pub const KEY_RESIZE: &str = "key-resize";

    pub const MAXIMIZE_BINDING: &str = "resizerable-maximize-window";
    pub const RESIZE_BINDING: &str = "resizerable-resize-window";

    /// Every key holding shortcut lists, user-facing and canonical.
    pub const SHORTCUT_KEYS: [&str; 4] = [KEY_MAXIMIZE, KEY_RESIZE, MAXIMIZE_BINDING, RESIZE_BINDING];
}

/// Logical action reachable through a keybinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Maximize,
    Resize,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Maximize, Action::Resize];

    /// User-facing shortcut key edited by preference front-ends.
    pub fn shortcut_key(self) -> &'static str {
        match self {
            Action::Maximize => keys::KEY_MAXIMIZE,
            Action::Resize => keys::KEY_RESIZE,
        }
    }

    /// Canonical key, also the name the binding is registered under.
    pub fn binding_name(self) -> &'static str {
        match self {
            Action::Maximize => keys::MAXIMIZE_BINDING,
            Action::Resize => keys::RESIZE_BINDING,
        }
    }

    pub fn from_binding_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.binding_name() == name)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Maximize => write!(f, "maximize"),
            Action::Resize => write!(f, "resize"),
        }
    }
}
