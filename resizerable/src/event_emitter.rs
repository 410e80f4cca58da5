use resizerable_proto::{Action, Rect, ResizerEvent, WindowId};
use std::sync::mpsc as std_mpsc;

/// Event emitter for publishing engine decisions to observers.
/// Uses std::sync::mpsc so observers may live on another thread.
pub struct EventEmitter {
    tx: std_mpsc::Sender<ResizerEvent>,
}

impl EventEmitter {
    pub fn new(tx: std_mpsc::Sender<ResizerEvent>) -> Self {
        Self { tx }
    }

    /// Send an event to subscribers
    fn emit(&self, event: ResizerEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Failed to emit event (no receivers?): {}", e);
        }
    }

    pub fn emit_enabled(&self, tracked_windows: usize) {
        self.emit(ResizerEvent::Enabled { tracked_windows });
    }

    pub fn emit_disabled(&self) {
        self.emit(ResizerEvent::Disabled);
    }

    pub fn emit_window_tracked(&self, window_id: WindowId) {
        self.emit(ResizerEvent::WindowTracked { window_id });
    }

    pub fn emit_window_untracked(&self, window_id: WindowId) {
        self.emit(ResizerEvent::WindowUntracked { window_id });
    }

    pub fn emit_binding_added(&self, action: Action, accelerator: &str) {
        self.emit(ResizerEvent::BindingAdded {
            action,
            accelerator: accelerator.to_string(),
        });
    }

    pub fn emit_binding_failed(&self, action: Action, accelerator: &str) {
        self.emit(ResizerEvent::BindingFailed {
            action,
            accelerator: accelerator.to_string(),
        });
    }

    pub fn emit_bindings_removed(&self) {
        self.emit(ResizerEvent::BindingsRemoved);
    }

    pub fn emit_bindings_reset(&self, reason: &str) {
        self.emit(ResizerEvent::BindingsReset {
            reason: reason.to_string(),
        });
    }

    pub fn emit_minimize_vetoed(&self, window_id: WindowId, current_area: u64, target_area: u64) {
        self.emit(ResizerEvent::MinimizeVetoed {
            window_id,
            current_area,
            target_area,
        });
    }

    pub fn emit_minimize_allowed(&self, window_id: WindowId, current_area: u64, target_area: u64) {
        self.emit(ResizerEvent::MinimizeAllowed {
            window_id,
            current_area,
            target_area,
        });
    }

    pub fn emit_window_resized(&self, window_id: WindowId, target: Rect) {
        self.emit(ResizerEvent::WindowResized { window_id, target });
    }

    pub fn emit_window_minimized(&self, window_id: WindowId) {
        self.emit(ResizerEvent::WindowMinimized { window_id });
    }

    pub fn emit_window_maximized(&self, window_id: WindowId) {
        self.emit(ResizerEvent::WindowMaximized { window_id });
    }
}
