mod commands;
mod effects;
mod keybindings;
mod registry;
mod smart_minimize;

use commands::{maximize_window, resize_window};
use keybindings::KeybindingManager;
use registry::WindowRegistry;
use smart_minimize::on_minimized_changed;

use crate::error::{ResizerError, Result};
use crate::event::Event;
use crate::event_emitter::EventEmitter;
use crate::platform::{HostResult, SettingsStore, SignalId, WindowManager};
use resizerable_proto::{keys, Action};

/// The add-on as the host sees it: inert until enabled, and fully torn down
/// again by `disable`.
pub struct Extension<S: SettingsStore> {
    settings: Option<S>,
    settings_signals: Vec<SignalId>,
    window_signals: Vec<SignalId>,
    keybindings: KeybindingManager,
    registry: WindowRegistry,
    event_emitter: EventEmitter,
}

impl<S: SettingsStore> Extension<S> {
    pub fn new(event_emitter: EventEmitter) -> Self {
        Self {
            settings: None,
            settings_signals: Vec::new(),
            window_signals: Vec::new(),
            keybindings: KeybindingManager::new(),
            registry: WindowRegistry::new(),
            event_emitter,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn keybindings(&self) -> &KeybindingManager {
        &self.keybindings
    }

    pub fn enable<W: WindowManager>(&mut self, wm: &W, settings: HostResult<S>) -> Result<()> {
        if self.is_enabled() {
            tracing::debug!("Already enabled");
            return Ok(());
        }

        let settings = settings.map_err(|e| {
            tracing::error!("Cannot open settings: {}", e);
            ResizerError::SettingsUnavailable(e)
        })?;

        for key in [keys::KEY_MAXIMIZE, keys::KEY_RESIZE] {
            match settings.connect_changed(key) {
                Ok(id) => self.settings_signals.push(id),
                Err(e) => tracing::warn!("Failed to watch {}: {}", key, e),
            }
        }

        if let Err(e) = self
            .keybindings
            .sync_keybindings(wm, &settings, &self.event_emitter)
        {
            tracing::warn!("Continuing without keybindings: {}", e);
        }

        for (what, connected) in [
            ("window-created", wm.connect_window_created()),
            ("window-removed", wm.connect_window_removed()),
        ] {
            match connected {
                Ok(id) => self.window_signals.push(id),
                Err(e) => tracing::warn!("Failed to subscribe to {}: {}", what, e),
            }
        }

        for window in self.registry.attach_all(wm, &wm.enumerate_windows()) {
            self.event_emitter.emit_window_tracked(window);
        }

        self.settings = Some(settings);
        tracing::info!("Enabled, tracking {} windows", self.registry.len());
        self.event_emitter.emit_enabled(self.registry.len());
        Ok(())
    }

    pub fn disable<W: WindowManager>(&mut self, wm: &W) {
        let Some(settings) = self.settings.take() else {
            tracing::debug!("Already disabled");
            return;
        };

        for id in self.settings_signals.drain(..) {
            if let Err(e) = settings.disconnect(id) {
                tracing::warn!("Failed to disconnect settings handler: {}", e);
            }
        }

        self.keybindings.remove_keybindings(wm, &self.event_emitter);

        for id in self.window_signals.drain(..) {
            if let Err(e) = wm.disconnect(id) {
                tracing::warn!("Failed to disconnect window handler: {}", e);
            }
        }

        for window in self.registry.detach_all(wm) {
            self.event_emitter.emit_window_untracked(window);
        }

        tracing::info!("Disabled");
        self.event_emitter.emit_disabled();
    }

    /// Process one host notification. Ignored while disabled.
    pub fn handle_event<W: WindowManager>(&mut self, wm: &W, event: &Event) {
        let Some(settings) = self.settings.as_ref() else {
            tracing::debug!("Disabled, dropping {:?}", event);
            return;
        };

        match event {
            Event::SettingChanged { key } => {
                if key != keys::KEY_MAXIMIZE && key != keys::KEY_RESIZE {
                    return;
                }
                tracing::debug!("{} changed, resyncing keybindings", key);
                if let Err(e) = self
                    .keybindings
                    .sync_keybindings(wm, settings, &self.event_emitter)
                {
                    tracing::warn!("{}", e);
                }
            }
            Event::WindowCreated { window } => {
                if self.registry.attach(wm, *window) {
                    self.event_emitter.emit_window_tracked(*window);
                }
            }
            Event::WindowRemoved { window } => match self.registry.detach(wm, *window) {
                Ok(true) => self.event_emitter.emit_window_untracked(*window),
                Ok(false) => {}
                Err(e) => {
                    // The host usually drops a destroyed window's handlers itself
                    tracing::debug!("{}", e);
                    self.event_emitter.emit_window_untracked(*window);
                }
            },
            Event::MinimizedChanged { window } => {
                if !self.registry.contains(*window) {
                    tracing::debug!("Minimized change for untracked window {}", window);
                    return;
                }
                on_minimized_changed(wm, settings, *window, &self.event_emitter);
            }
            Event::KeybindingActivated { name } => {
                let Some(action) = Action::from_binding_name(name) else {
                    tracing::warn!("Unknown keybinding {}", name);
                    return;
                };
                tracing::debug!("Keybinding {} activated", action);
                let result = match action {
                    Action::Maximize => maximize_window(wm, &self.event_emitter).map(|_| ()),
                    Action::Resize => {
                        resize_window(wm, settings, &self.event_emitter).map(|_| ())
                    }
                };
                if let Err(e) = result {
                    tracing::warn!("{} failed: {}", action, e);
                }
            }
        }
    }
}
