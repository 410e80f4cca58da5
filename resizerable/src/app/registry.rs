use std::collections::HashMap;

use crate::error::{ResizerError, Result};
use crate::platform::{SignalId, WindowSignals, WindowSystem};
use resizerable_proto::WindowId;

/// Minimized-state observers, one per live window.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    observers: HashMap<WindowId, SignalId>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.observers.contains_key(&window)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Start observing `window`. Returns `true` if a new observer was added.
    pub fn attach<W: WindowSystem + WindowSignals>(&mut self, wm: &W, window: WindowId) -> bool {
        if self.observers.contains_key(&window) {
            return false;
        }
        if !wm.is_valid(window) {
            tracing::debug!("{}", ResizerError::InvalidWindow(window));
            return false;
        }

        match wm.connect_minimized_changed(window) {
            Ok(id) => {
                self.observers.insert(window, id);
                tracing::debug!("Added observer for window {}", window);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to add observer for window {}: {}", window, e);
                false
            }
        }
    }

    /// Attach every window in `windows`, returning the newly observed ones.
    pub fn attach_all<W: WindowSystem + WindowSignals>(
        &mut self,
        wm: &W,
        windows: &[WindowId],
    ) -> Vec<WindowId> {
        tracing::info!("Starting observers for {} windows", windows.len());
        windows
            .iter()
            .copied()
            .filter(|&window| self.attach(wm, window))
            .collect()
    }

    /// Stop observing `window`.
    ///
    /// Returns `Ok(false)` if it was not tracked. The entry is removed even
    /// when the host fails to disconnect the observer.
    pub fn detach<W: WindowSignals>(&mut self, wm: &W, window: WindowId) -> Result<bool> {
        let Some(id) = self.observers.remove(&window) else {
            return Ok(false);
        };
        tracing::debug!("Removed observer for window {}", window);
        wm.disconnect(id)
            .map(|()| true)
            .map_err(|source| ResizerError::ObserverTeardown { window, source })
    }

    /// Detach every tracked window. Safe when windows are already gone.
    pub fn detach_all<W: WindowSignals>(&mut self, wm: &W) -> Vec<WindowId> {
        let windows: Vec<WindowId> = self.observers.keys().copied().collect();
        for &window in &windows {
            if let Err(e) = self.detach(wm, window) {
                tracing::debug!("{}", e);
            }
        }
        self.observers.clear();
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures::{create_test_window, setup_host};
    use crate::sim::HostCall;

    #[test]
    fn test_attach_is_idempotent() {
        let host = setup_host();
        let mut registry = WindowRegistry::new();

        assert!(registry.attach(&host, 1));
        assert!(!registry.attach(&host, 1));

        assert_eq!(registry.len(), 1);
        assert_eq!(host.minimized_connections(1), 1);
    }

    #[test]
    fn test_attach_skips_invalid_windows() {
        let host = setup_host();
        let mut registry = WindowRegistry::new();

        assert!(!registry.attach(&host, 99));
        host.mark_destroying(2);
        assert!(!registry.attach(&host, 2));
        assert!(registry.is_empty());
        assert_eq!(host.live_connections(), 0);
    }

    #[test]
    fn test_attach_all_covers_existing_windows() {
        let host = setup_host();
        host.add_window(&create_test_window(3, 400, 300));
        let mut registry = WindowRegistry::new();

        let added = registry.attach_all(&host, &[1, 2, 3, 2]);

        assert_eq!(added, vec![1, 2, 3]);
        assert_eq!(registry.len(), 3);
        assert_eq!(host.live_connections(), 3);
    }

    #[test]
    fn test_detach_twice_is_noop() {
        let host = setup_host();
        let mut registry = WindowRegistry::new();
        registry.attach(&host, 1);

        assert_eq!(registry.detach(&host, 1), Ok(true));
        assert_eq!(registry.detach(&host, 1), Ok(false));

        let disconnects = host
            .calls()
            .iter()
            .filter(|c| matches!(c, HostCall::Disconnect(_)))
            .count();
        assert_eq!(disconnects, 1);
        assert_eq!(host.minimized_connections(1), 0);
    }

    #[test]
    fn test_detach_removes_entry_when_disconnect_fails() {
        let host = setup_host();
        let mut registry = WindowRegistry::new();
        registry.attach(&host, 1);
        host.faults().disconnect_throws = true;

        let result = registry.detach(&host, 1);

        assert!(matches!(
            result,
            Err(ResizerError::ObserverTeardown { window: 1, .. })
        ));
        assert!(!registry.contains(1));
    }

    #[test]
    fn test_detach_all_tolerates_destroyed_windows() {
        let host = setup_host();
        let mut registry = WindowRegistry::new();
        registry.attach_all(&host, &[1, 2]);

        // Window 2 disappears without a removal notification reaching us
        host.remove_window(2);

        let mut detached = registry.detach_all(&host);
        detached.sort();
        assert_eq!(detached, vec![1, 2]);
        assert!(registry.is_empty());
        assert_eq!(host.live_connections(), 0);
    }
}
