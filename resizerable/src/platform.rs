use crate::error::HostError;
use resizerable_proto::{Rect, WindowId, WorkArea};

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Handle of a host-side signal connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub u64);

/// Handle returned by a successful keybinding registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub u64);

/// Action mode a keybinding is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingMode {
    /// Regular desktop use, no modal dialogs or overview.
    #[default]
    Normal,
}

/// Trait for querying window and monitor information from the host.
/// This abstraction allows driving the engine with fakes.
pub trait WindowSystem {
    fn focused_window(&self) -> Option<WindowId>;
    fn enumerate_windows(&self) -> Vec<WindowId>;
    /// Whether the window can still accept signal connections.
    fn is_valid(&self, window: WindowId) -> bool;
    fn frame_rect(&self, window: WindowId) -> HostResult<Rect>;
    fn monitor_index(&self, window: WindowId) -> HostResult<Option<usize>>;
    fn work_area(&self, monitor: usize) -> Option<WorkArea>;
    fn is_maximized(&self, window: WindowId) -> HostResult<bool>;
    fn is_minimized(&self, window: WindowId) -> HostResult<bool>;
    fn can_maximize(&self, window: WindowId) -> HostResult<bool>;
}

/// Trait for manipulating windows (side effects).
pub trait WindowManipulator {
    fn move_resize_frame(&self, window: WindowId, user_op: bool, rect: Rect) -> HostResult<()>;
    fn maximize(&self, window: WindowId) -> HostResult<()>;
    fn unmaximize(&self, window: WindowId) -> HostResult<()>;
    fn minimize(&self, window: WindowId) -> HostResult<()>;
    fn unminimize(&self, window: WindowId) -> HostResult<()>;
}

/// Trait for window lifecycle and state notifications.
///
/// Notifications are not delivered through callbacks: while a connection is
/// live the host queues the matching [`crate::event::Event`] on its event
/// loop and hands it to the engine once the current callback returns.
pub trait WindowSignals {
    fn connect_minimized_changed(&self, window: WindowId) -> HostResult<SignalId>;
    fn connect_window_created(&self) -> HostResult<SignalId>;
    fn connect_window_removed(&self) -> HostResult<SignalId>;
    fn disconnect(&self, id: SignalId) -> HostResult<()>;
}

/// Trait for registering named keybindings.
pub trait KeybindingHost {
    /// Register `name`, reading its accelerators from `settings` under the
    /// same key. `Ok(None)` means the host declined (e.g. already taken).
    fn add_keybinding<S: SettingsStore>(
        &self,
        name: &str,
        settings: &S,
        mode: BindingMode,
    ) -> HostResult<Option<BindingId>>;
    fn remove_keybinding(&self, name: &str) -> HostResult<()>;
}

/// Everything the engine needs from the window manager.
pub trait WindowManager: WindowSystem + WindowManipulator + WindowSignals + KeybindingHost {}

impl<T> WindowManager for T where T: WindowSystem + WindowManipulator + WindowSignals + KeybindingHost {}

/// Typed key/value settings store with change notification.
pub trait SettingsStore {
    fn get_double(&self, key: &str) -> HostResult<f64>;
    fn get_strv(&self, key: &str) -> HostResult<Vec<String>>;
    fn get_boolean(&self, key: &str) -> HostResult<bool>;
    fn set_double(&self, key: &str, value: f64) -> HostResult<()>;
    fn set_strv(&self, key: &str, value: &[String]) -> HostResult<()>;
    fn set_boolean(&self, key: &str, value: bool) -> HostResult<()>;
    fn connect_changed(&self, key: &str) -> HostResult<SignalId>;
    fn disconnect(&self, id: SignalId) -> HostResult<()>;
}
