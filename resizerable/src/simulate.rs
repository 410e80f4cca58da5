use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::app::Extension;
use crate::core::{apply_seed, reset_to_defaults};
use crate::event_emitter::EventEmitter;
use crate::platform::{SettingsStore, WindowManipulator};
use crate::sim::{SimHost, SimSettings};
use resizerable_proto::{Action, Rect, ResizerEvent, Scenario, ScenarioStep, SettingsSeed, WindowId};

/// Deliver queued host notifications until the loop is idle.
pub fn pump(host: &SimHost, ext: &mut Extension<SimSettings>) -> usize {
    let mut handled = 0;
    while let Some(event) = host.next_event() {
        tracing::trace!("Delivering {:?}", event);
        ext.handle_event(host, &event);
        handled += 1;
    }
    handled
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("resizerable").join("settings.json"))
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scenario: {}", path.display()))
}

pub fn load_seed(path: &Path) -> Result<SettingsSeed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))
}

/// Pick the initial settings: an explicit file, then the scenario's own
/// seed, then the user's config file, then defaults.
pub fn resolve_seed(scenario: &Scenario, explicit: Option<&Path>) -> Result<SettingsSeed> {
    if let Some(path) = explicit {
        return load_seed(path);
    }
    if let Some(seed) = &scenario.settings {
        return Ok(seed.clone());
    }
    match default_settings_path() {
        Some(path) if path.exists() => {
            tracing::info!("Using settings from {}", path.display());
            load_seed(&path)
        }
        _ => Ok(SettingsSeed::default()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    pub id: WindowId,
    pub title: String,
    pub frame: Rect,
    pub maximized: bool,
    pub minimized: bool,
    pub tracked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub enabled: bool,
    pub bindings: Vec<Action>,
    pub windows: Vec<WindowReport>,
    #[serde(skip)]
    pub events: Vec<ResizerEvent>,
}

/// Replay `scenario` against a fresh simulated desktop with the engine
/// enabled from the start.
pub fn run(scenario: &Scenario, seed: &SettingsSeed) -> Result<Report> {
    let host = SimHost::new()
        .with_monitors(scenario.monitors.clone())
        .with_windows(scenario.windows.clone());
    apply_seed(&host.settings(), seed).context("Failed to apply settings")?;

    let (event_tx, event_rx) = std_mpsc::channel();
    let mut ext = Extension::new(EventEmitter::new(event_tx));
    ext.enable(&host, host.open_settings())?;
    pump(&host, &mut ext);

    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("Step {}: {:?}", index + 1, step);
        apply_step(&host, &mut ext, step).with_context(|| format!("Step {} failed", index + 1))?;
        pump(&host, &mut ext);
    }

    let windows = host
        .window_ids()
        .into_iter()
        .filter_map(|id| {
            host.window(id).map(|w| WindowReport {
                id,
                title: w.title,
                frame: w.frame,
                maximized: w.maximized,
                minimized: w.minimized,
                tracked: ext.registry().contains(id),
            })
        })
        .collect();

    Ok(Report {
        enabled: ext.is_enabled(),
        bindings: Action::ALL
            .into_iter()
            .filter(|&action| ext.keybindings().binding(action).is_some())
            .collect(),
        windows,
        events: event_rx.try_iter().collect(),
    })
}

fn apply_step(host: &SimHost, ext: &mut Extension<SimSettings>, step: &ScenarioStep) -> Result<()> {
    match step {
        ScenarioStep::Minimize { window } => host.minimize(*window)?,
        ScenarioStep::Unminimize { window } => host.unminimize(*window)?,
        ScenarioStep::Focus { window } => host.focus(*window),
        ScenarioStep::Press { accelerator } => host.press(accelerator),
        ScenarioStep::CreateWindow { window } => host.add_window(window),
        ScenarioStep::RemoveWindow { window } => host.remove_window(*window),
        ScenarioStep::SetStrv { key, value } => host.settings().set_strv(key, value)?,
        ScenarioStep::SetDouble { key, value } => host.settings().set_double(key, *value)?,
        ScenarioStep::SetBoolean { key, value } => host.settings().set_boolean(key, *value)?,
        ScenarioStep::ResetDefaults => reset_to_defaults(&host.settings())?,
        ScenarioStep::Enable => ext.enable(host, host.open_settings())?,
        ScenarioStep::Disable => ext.disable(host),
    }
    Ok(())
}
