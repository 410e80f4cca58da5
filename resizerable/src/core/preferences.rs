use crate::platform::{HostResult, SettingsStore};
use resizerable_proto::margins::DEFAULT_MARGIN;
use resizerable_proto::{keys, Margins, SettingsSeed};

/// Read the current margins. Unreadable keys fall back to the default.
pub fn read_margins<S: SettingsStore>(settings: &S) -> Margins {
    let read = |key: &str| match settings.get_double(key) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}, using default", key, e);
            DEFAULT_MARGIN
        }
    };
    Margins {
        top: read(keys::MARGIN_TOP),
        right: read(keys::MARGIN_RIGHT),
        bottom: read(keys::MARGIN_BOTTOM),
        left: read(keys::MARGIN_LEFT),
    }
    .sanitized()
}

pub fn read_smart_minimize<S: SettingsStore>(settings: &S) -> bool {
    settings
        .get_boolean(keys::SMART_MINIMIZE)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read {}: {}", keys::SMART_MINIMIZE, e);
            false
        })
}

/// Read a shortcut list; unreadable keys read as empty.
pub fn read_shortcuts<S: SettingsStore>(settings: &S, key: &str) -> Vec<String> {
    settings.get_strv(key).unwrap_or_else(|e| {
        tracing::warn!("Failed to read {}: {}", key, e);
        Vec::new()
    })
}

/// First meaningful accelerator of a shortcut list.
pub fn primary_accelerator(shortcuts: &[String]) -> Option<&str> {
    shortcuts
        .first()
        .map(String::as_str)
        .filter(|accel| !accel.is_empty())
}

/// Restore default margins and clear the user-facing shortcuts.
///
/// Canonical binding keys are left to the change notification path,
/// which re-synchronises them from the cleared user-facing keys.
pub fn reset_to_defaults<S: SettingsStore>(settings: &S) -> HostResult<()> {
    for key in [
        keys::MARGIN_LEFT,
        keys::MARGIN_RIGHT,
        keys::MARGIN_TOP,
        keys::MARGIN_BOTTOM,
    ] {
        settings.set_double(key, DEFAULT_MARGIN)?;
    }
    settings.set_strv(keys::KEY_MAXIMIZE, &[])?;
    settings.set_strv(keys::KEY_RESIZE, &[])?;
    tracing::info!("Settings reset to defaults");
    Ok(())
}

/// Write a seed into a store, e.g. when priming a simulated session.
pub fn apply_seed<S: SettingsStore>(settings: &S, seed: &SettingsSeed) -> HostResult<()> {
    settings.set_double(keys::MARGIN_TOP, seed.margins.top)?;
    settings.set_double(keys::MARGIN_RIGHT, seed.margins.right)?;
    settings.set_double(keys::MARGIN_BOTTOM, seed.margins.bottom)?;
    settings.set_double(keys::MARGIN_LEFT, seed.margins.left)?;
    settings.set_boolean(keys::SMART_MINIMIZE, seed.smart_minimize)?;
    settings.set_strv(keys::KEY_MAXIMIZE, &seed.key_maximize)?;
    settings.set_strv(keys::KEY_RESIZE, &seed.key_resize)?;
    Ok(())
}
