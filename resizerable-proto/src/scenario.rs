use serde::{Deserialize, Serialize};

use crate::{Margins, Rect, WindowId};

/// A replayable session against a simulated desktop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Work areas indexed by monitor number
    #[serde(default)]
    pub monitors: Vec<Rect>,
    /// Windows open before the engine is enabled
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
    #[serde(default)]
    pub settings: Option<SettingsSeed>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSpec {
    pub id: WindowId,
    #[serde(default)]
    pub title: String,
    pub frame: Rect,
    /// Monitor index; `None` models a window whose monitor cannot be resolved
    #[serde(default)]
    pub monitor: Option<usize>,
    #[serde(default)]
    pub maximized: bool,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default = "default_true")]
    pub can_maximize: bool,
    #[serde(default)]
    pub focused: bool,
}

fn default_true() -> bool {
    true
}

/// Initial contents of the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsSeed {
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub smart_minimize: bool,
    #[serde(default)]
    pub key_maximize: Vec<String>,
    #[serde(default)]
    pub key_resize: Vec<String>,
}

impl Default for SettingsSeed {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            smart_minimize: false,
            key_maximize: Vec::new(),
            key_resize: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    // User actions on windows
    Minimize { window: WindowId },
    Unminimize { window: WindowId },
    Focus { window: Option<WindowId> },
    Press { accelerator: String },

    // Window lifecycle
    CreateWindow { window: WindowSpec },
    RemoveWindow { window: WindowId },

    // Settings edits
    SetStrv { key: String, value: Vec<String> },
    SetDouble { key: String, value: f64 },
    SetBoolean { key: String, value: bool },
    ResetDefaults,

    // Extension lifecycle
    Enable,
    Disable,
}
