use crate::core::{primary_accelerator, read_shortcuts};
use crate::error::{ResizerError, Result};
use crate::event_emitter::EventEmitter;
use crate::platform::{BindingId, BindingMode, HostResult, KeybindingHost, SettingsStore};
use resizerable_proto::{keys, Action};

/// Keeps the canonical binding keys in sync with the user-facing shortcut
/// keys and holds at most one host binding per action.
#[derive(Debug, Default)]
pub struct KeybindingManager {
    maximize: Option<BindingId>,
    resize: Option<BindingId>,
}

impl KeybindingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self, action: Action) -> Option<BindingId> {
        match action {
            Action::Maximize => self.maximize,
            Action::Resize => self.resize,
        }
    }

    fn slot(&mut self, action: Action) -> &mut Option<BindingId> {
        match action {
            Action::Maximize => &mut self.maximize,
            Action::Resize => &mut self.resize,
        }
    }

    /// Copy the user-facing shortcuts into the canonical keys, then rebind.
    pub fn sync_keybindings<H: KeybindingHost, S: SettingsStore>(
        &mut self,
        host: &H,
        settings: &S,
        event_emitter: &EventEmitter,
    ) -> Result<()> {
        for action in Action::ALL {
            let shortcuts = read_shortcuts(settings, action.shortcut_key());
            if let Err(e) = settings.set_strv(action.binding_name(), &shortcuts) {
                tracing::warn!("Failed to sync {}: {}", action.binding_name(), e);
            }
        }
        self.update_keybindings(host, settings, event_emitter)
    }

    /// Tear down every binding, then register each action with a shortcut.
    ///
    /// A declined registration leaves that action unbound. A host error while
    /// registering drops all bindings and clears every shortcut key.
    pub fn update_keybindings<H: KeybindingHost, S: SettingsStore>(
        &mut self,
        host: &H,
        settings: &S,
        event_emitter: &EventEmitter,
    ) -> Result<()> {
        self.remove_keybindings(host, event_emitter);

        match self.add_keybindings(host, settings, event_emitter) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!("Error setting up keybindings: {}", e);
                self.remove_keybindings(host, event_emitter);
                clear_shortcuts(settings);
                event_emitter.emit_bindings_reset(&e.to_string());
                Err(ResizerError::BindingSetup(e))
            }
        }
    }

    fn add_keybindings<H: KeybindingHost, S: SettingsStore>(
        &mut self,
        host: &H,
        settings: &S,
        event_emitter: &EventEmitter,
    ) -> HostResult<()> {
        for action in Action::ALL {
            let shortcuts = read_shortcuts(settings, action.binding_name());
            let Some(accelerator) = primary_accelerator(&shortcuts) else {
                continue;
            };

            match host.add_keybinding(action.binding_name(), settings, BindingMode::Normal)? {
                Some(id) => {
                    tracing::info!("Bound {} to {}", accelerator, action);
                    *self.slot(action) = Some(id);
                    event_emitter.emit_binding_added(action, accelerator);
                }
                None => {
                    let err = ResizerError::BindingAddFailure {
                        action,
                        accelerator: accelerator.to_string(),
                    };
                    tracing::warn!("{}", err);
                    event_emitter.emit_binding_failed(action, accelerator);
                }
            }
        }
        Ok(())
    }

    /// Unregister held bindings. Local handles are always dropped, even if
    /// the host fails to remove them.
    pub fn remove_keybindings<H: KeybindingHost>(&mut self, host: &H, event_emitter: &EventEmitter) {
        let mut removed = false;
        for action in Action::ALL {
            if self.slot(action).take().is_none() {
                continue;
            }
            removed = true;
            if let Err(e) = host.remove_keybinding(action.binding_name()) {
                tracing::error!("Error removing {} keybinding: {}", action, e);
            }
        }
        if removed {
            event_emitter.emit_bindings_removed();
        }
    }
}

fn clear_shortcuts<S: SettingsStore>(settings: &S) {
    for key in keys::SHORTCUT_KEYS {
        if let Err(e) = settings.set_strv(key, &[]) {
            tracing::warn!("Failed to clear {}: {}", key, e);
        }
    }
}
