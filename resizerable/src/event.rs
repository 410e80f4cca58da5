use resizerable_proto::WindowId;

/// Notifications the host delivers to the engine on its event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SettingChanged { key: String },
    WindowCreated { window: WindowId },
    WindowRemoved { window: WindowId },
    MinimizedChanged { window: WindowId },
    KeybindingActivated { name: String },
}
