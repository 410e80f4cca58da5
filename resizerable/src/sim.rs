//! In-memory desktop host.
//!
//! Models the host's single event loop: state-changing calls queue the
//! notifications a real window manager would emit, but only while a matching
//! connection is live, and [`SimHost::next_event`] hands them out one at a
//! time after the current callback has returned.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::error::HostError;
use crate::event::Event;
use crate::platform::{
    BindingId, BindingMode, HostResult, KeybindingHost, SettingsStore, SignalId, WindowManipulator,
    WindowSignals, WindowSystem,
};
use resizerable_proto::margins::DEFAULT_MARGIN;
use resizerable_proto::{keys, Rect, WindowId, WindowSpec, WorkArea};

#[derive(Debug, Clone, PartialEq)]
pub struct SimWindow {
    pub title: String,
    pub frame: Rect,
    pub monitor: Option<usize>,
    pub maximized: bool,
    pub minimized: bool,
    pub can_maximize: bool,
    /// Set while the window is being torn down; it refuses new connections.
    pub destroying: bool,
    restore_frame: Option<Rect>,
}

impl SimWindow {
    fn from_spec(spec: &WindowSpec) -> Self {
        Self {
            title: spec.title.clone(),
            frame: spec.frame,
            monitor: spec.monitor,
            maximized: spec.maximized,
            minimized: spec.minimized,
            can_maximize: spec.can_maximize,
            destroying: false,
            restore_frame: None,
        }
    }
}

/// Host calls recorded for assertions and scenario reports.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    MoveResize { window: WindowId, rect: Rect },
    Maximize(WindowId),
    Unmaximize(WindowId),
    Minimize(WindowId),
    Unminimize(WindowId),
    AddKeybinding(String),
    RemoveKeybinding(String),
    Disconnect(SignalId),
}

/// Fault injection switches.
#[derive(Debug, Default)]
pub struct Faults {
    pub settings_unavailable: bool,
    pub add_keybinding_throws: bool,
    /// Binding names whose registration raises.
    pub add_keybinding_throws_for: HashSet<String>,
    pub remove_keybinding_throws: bool,
    pub disconnect_throws: bool,
    /// Accelerators already grabbed elsewhere; registering them is declined.
    pub taken_accelerators: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Double(f64),
    Strv(Vec<String>),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
enum Connection {
    MinimizedChanged(WindowId),
    WindowCreated,
    WindowRemoved,
    SettingChanged(String),
}

#[derive(Default)]
struct Inner {
    monitors: RefCell<Vec<WorkArea>>,
    windows: RefCell<BTreeMap<WindowId, SimWindow>>,
    focused: Cell<Option<WindowId>>,
    settings: RefCell<HashMap<String, Value>>,
    connections: RefCell<BTreeMap<SignalId, Connection>>,
    next_signal: Cell<u64>,
    bindings: RefCell<BTreeMap<String, BindingId>>,
    binding_ids: RefCell<HashMap<String, BindingId>>,
    queue: RefCell<VecDeque<Event>>,
    calls: RefCell<Vec<HostCall>>,
    faults: RefCell<Faults>,
}

impl Inner {
    fn connect(&self, connection: Connection) -> SignalId {
        let id = SignalId(self.next_signal.get() + 1);
        self.next_signal.set(id.0);
        self.connections.borrow_mut().insert(id, connection);
        id
    }

    fn disconnect(&self, id: SignalId) -> HostResult<()> {
        self.calls.borrow_mut().push(HostCall::Disconnect(id));
        if self.faults.borrow().disconnect_throws {
            return Err(HostError::new(format!("disconnect of {:?} failed", id)));
        }
        match self.connections.borrow_mut().remove(&id) {
            Some(_) => Ok(()),
            None => Err(HostError::new(format!("no handler with id {}", id.0))),
        }
    }

    /// Queue `event` once per live connection accepting it.
    fn notify(&self, accepts: impl Fn(&Connection) -> bool, event: Event) {
        let count = self
            .connections
            .borrow()
            .values()
            .filter(|c| accepts(c))
            .count();
        let mut queue = self.queue.borrow_mut();
        for _ in 0..count {
            queue.push_back(event.clone());
        }
    }

    fn with_window<T>(
        &self,
        window: WindowId,
        f: impl FnOnce(&mut SimWindow) -> T,
    ) -> HostResult<T> {
        let mut windows = self.windows.borrow_mut();
        let win = windows
            .get_mut(&window)
            .ok_or_else(|| HostError::new(format!("no such window {}", window)))?;
        Ok(f(win))
    }

    fn set_minimized(&self, window: WindowId, minimized: bool) -> HostResult<()> {
        let changed = self.with_window(window, |w| {
            let changed = w.minimized != minimized;
            w.minimized = minimized;
            changed
        })?;
        if changed {
            self.notify(
                |c| *c == Connection::MinimizedChanged(window),
                Event::MinimizedChanged { window },
            );
        }
        Ok(())
    }

    fn get(&self, key: &str) -> HostResult<Value> {
        if let Some(value) = self.settings.borrow().get(key) {
            return Ok(value.clone());
        }
        default_value(key).ok_or_else(|| HostError::new(format!("no such key {:?}", key)))
    }

    fn set(&self, key: &str, value: Value) -> HostResult<()> {
        let current = self.get(key)?;
        if std::mem::discriminant(&current) != std::mem::discriminant(&value) {
            return Err(HostError::new(format!("type mismatch for key {:?}", key)));
        }
        if current == value {
            return Ok(());
        }
        self.settings.borrow_mut().insert(key.to_string(), value);
        self.notify(
            |c| matches!(c, Connection::SettingChanged(k) if k == key),
            Event::SettingChanged {
                key: key.to_string(),
            },
        );
        Ok(())
    }
}

fn default_value(key: &str) -> Option<Value> {
    match key {
        keys::MARGIN_LEFT | keys::MARGIN_RIGHT | keys::MARGIN_TOP | keys::MARGIN_BOTTOM => {
            Some(Value::Double(DEFAULT_MARGIN))
        }
        keys::SMART_MINIMIZE => Some(Value::Boolean(false)),
        keys::KEY_MAXIMIZE | keys::KEY_RESIZE | keys::MAXIMIZE_BINDING | keys::RESIZE_BINDING => {
            Some(Value::Strv(Vec::new()))
        }
        _ => None,
    }
}

/// Simulated window manager, keybinding registry and event loop.
#[derive(Clone, Default)]
pub struct SimHost {
    inner: Rc<Inner>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monitors(self, monitors: Vec<WorkArea>) -> Self {
        *self.inner.monitors.borrow_mut() = monitors;
        self
    }

    pub fn with_windows(self, windows: Vec<WindowSpec>) -> Self {
        {
            let mut map = self.inner.windows.borrow_mut();
            for spec in &windows {
                map.insert(spec.id, SimWindow::from_spec(spec));
                if spec.focused {
                    self.inner.focused.set(Some(spec.id));
                }
            }
        }
        self
    }

    /// Settings store handle sharing this host's event loop.
    pub fn settings(&self) -> SimSettings {
        SimSettings {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Open the settings store, honouring `Faults::settings_unavailable`.
    pub fn open_settings(&self) -> HostResult<SimSettings> {
        if self.inner.faults.borrow().settings_unavailable {
            return Err(HostError::new("settings schema not installed"));
        }
        Ok(self.settings())
    }

    pub fn next_event(&self) -> Option<Event> {
        self.inner.queue.borrow_mut().pop_front()
    }

    pub fn window(&self, window: WindowId) -> Option<SimWindow> {
        self.inner.windows.borrow().get(&window).cloned()
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.inner.windows.borrow().keys().copied().collect()
    }

    pub fn focus(&self, window: Option<WindowId>) {
        self.inner.focused.set(window);
    }

    pub fn add_window(&self, spec: &WindowSpec) {
        self.inner
            .windows
            .borrow_mut()
            .insert(spec.id, SimWindow::from_spec(spec));
        if spec.focused {
            self.inner.focused.set(Some(spec.id));
        }
        self.inner.notify(
            |c| *c == Connection::WindowCreated,
            Event::WindowCreated { window: spec.id },
        );
    }

    /// Destroy a window. Its own signal connections die with it.
    pub fn remove_window(&self, window: WindowId) {
        if self.inner.windows.borrow_mut().remove(&window).is_none() {
            return;
        }
        if self.inner.focused.get() == Some(window) {
            self.inner.focused.set(None);
        }
        self.inner
            .connections
            .borrow_mut()
            .retain(|_, c| *c != Connection::MinimizedChanged(window));
        self.inner.notify(
            |c| *c == Connection::WindowRemoved,
            Event::WindowRemoved { window },
        );
    }

    /// Simulate the user pressing `accelerator`.
    pub fn press(&self, accelerator: &str) {
        let names: Vec<String> = self
            .inner
            .bindings
            .borrow()
            .keys()
            .filter(|name| {
                matches!(self.inner.get(name), Ok(Value::Strv(list)) if list.iter().any(|a| a == accelerator))
            })
            .cloned()
            .collect();
        if names.is_empty() {
            tracing::debug!("No binding for {}", accelerator);
        }
        let mut queue = self.inner.queue.borrow_mut();
        for name in names {
            queue.push_back(Event::KeybindingActivated { name });
        }
    }
}

#[cfg(test)]
impl SimHost {
    pub fn with_focused(self, window: Option<WindowId>) -> Self {
        self.inner.focused.set(window);
        self
    }

    pub fn faults(&self) -> std::cell::RefMut<'_, Faults> {
        self.inner.faults.borrow_mut()
    }

    pub fn pending_events(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.inner.calls.borrow_mut().clear();
    }

    pub fn mark_destroying(&self, window: WindowId) {
        let _ = self.inner.with_window(window, |w| w.destroying = true);
    }

    /// Live minimized-state connections for `window`.
    pub fn minimized_connections(&self, window: WindowId) -> usize {
        self.inner
            .connections
            .borrow()
            .values()
            .filter(|c| **c == Connection::MinimizedChanged(window))
            .count()
    }

    pub fn live_connections(&self) -> usize {
        self.inner.connections.borrow().len()
    }

    pub fn bound_names(&self) -> Vec<String> {
        self.inner.bindings.borrow().keys().cloned().collect()
    }
}

impl WindowSystem for SimHost {
    fn focused_window(&self) -> Option<WindowId> {
        self.inner.focused.get()
    }

    fn enumerate_windows(&self) -> Vec<WindowId> {
        self.window_ids()
    }

    fn is_valid(&self, window: WindowId) -> bool {
        self.inner
            .windows
            .borrow()
            .get(&window)
            .is_some_and(|w| !w.destroying)
    }

    fn frame_rect(&self, window: WindowId) -> HostResult<Rect> {
        self.inner.with_window(window, |w| w.frame)
    }

    fn monitor_index(&self, window: WindowId) -> HostResult<Option<usize>> {
        self.inner.with_window(window, |w| w.monitor)
    }

    fn work_area(&self, monitor: usize) -> Option<WorkArea> {
        self.inner.monitors.borrow().get(monitor).copied()
    }

    fn is_maximized(&self, window: WindowId) -> HostResult<bool> {
        self.inner.with_window(window, |w| w.maximized)
    }

    fn is_minimized(&self, window: WindowId) -> HostResult<bool> {
        self.inner.with_window(window, |w| w.minimized)
    }

    fn can_maximize(&self, window: WindowId) -> HostResult<bool> {
        self.inner.with_window(window, |w| w.can_maximize)
    }
}

impl WindowManipulator for SimHost {
    fn move_resize_frame(&self, window: WindowId, _user_op: bool, rect: Rect) -> HostResult<()> {
        self.inner
            .calls
            .borrow_mut()
            .push(HostCall::MoveResize { window, rect });
        self.inner.with_window(window, |w| w.frame = rect)
    }

    fn maximize(&self, window: WindowId) -> HostResult<()> {
        self.inner.calls.borrow_mut().push(HostCall::Maximize(window));
        let monitor = self.monitor_index(window)?;
        let area = monitor.and_then(|m| self.work_area(m));
        self.inner.with_window(window, |w| {
            if !w.maximized {
                w.restore_frame = Some(w.frame);
                if let Some(area) = area {
                    w.frame = area;
                }
                w.maximized = true;
            }
        })
    }

    fn unmaximize(&self, window: WindowId) -> HostResult<()> {
        self.inner
            .calls
            .borrow_mut()
            .push(HostCall::Unmaximize(window));
        self.inner.with_window(window, |w| {
            if w.maximized {
                w.maximized = false;
                if let Some(frame) = w.restore_frame.take() {
                    w.frame = frame;
                }
            }
        })
    }

    fn minimize(&self, window: WindowId) -> HostResult<()> {
        self.inner.calls.borrow_mut().push(HostCall::Minimize(window));
        self.inner.set_minimized(window, true)
    }

    fn unminimize(&self, window: WindowId) -> HostResult<()> {
        self.inner
            .calls
            .borrow_mut()
            .push(HostCall::Unminimize(window));
        self.inner.set_minimized(window, false)
    }
}

impl WindowSignals for SimHost {
    fn connect_minimized_changed(&self, window: WindowId) -> HostResult<SignalId> {
        if !self.is_valid(window) {
            return Err(HostError::new(format!("window {} is being destroyed", window)));
        }
        Ok(self.inner.connect(Connection::MinimizedChanged(window)))
    }

    fn connect_window_created(&self) -> HostResult<SignalId> {
        Ok(self.inner.connect(Connection::WindowCreated))
    }

    fn connect_window_removed(&self) -> HostResult<SignalId> {
        Ok(self.inner.connect(Connection::WindowRemoved))
    }

    fn disconnect(&self, id: SignalId) -> HostResult<()> {
        self.inner.disconnect(id)
    }
}

impl KeybindingHost for SimHost {
    fn add_keybinding<S: SettingsStore>(
        &self,
        name: &str,
        settings: &S,
        _mode: BindingMode,
    ) -> HostResult<Option<BindingId>> {
        self.inner
            .calls
            .borrow_mut()
            .push(HostCall::AddKeybinding(name.to_string()));
        let throws = {
            let faults = self.inner.faults.borrow();
            faults.add_keybinding_throws || faults.add_keybinding_throws_for.contains(name)
        };
        if throws {
            return Err(HostError::new(format!("cannot register {}", name)));
        }
        if self.inner.bindings.borrow().contains_key(name) {
            return Ok(None);
        }
        let accelerators = settings.get_strv(name)?;
        let Some(accel) = accelerators.first().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };
        if self.inner.faults.borrow().taken_accelerators.contains(accel) {
            return Ok(None);
        }

        let id = {
            let mut ids = self.inner.binding_ids.borrow_mut();
            let next = BindingId(ids.len() as u64 + 1);
            *ids.entry(name.to_string()).or_insert(next)
        };
        self.inner
            .bindings
            .borrow_mut()
            .insert(name.to_string(), id);
        Ok(Some(id))
    }

    fn remove_keybinding(&self, name: &str) -> HostResult<()> {
        self.inner
            .calls
            .borrow_mut()
            .push(HostCall::RemoveKeybinding(name.to_string()));
        if self.inner.faults.borrow().remove_keybinding_throws {
            return Err(HostError::new(format!("cannot remove {}", name)));
        }
        self.inner.bindings.borrow_mut().remove(name);
        Ok(())
    }
}

/// Settings store backed by the simulated host.
#[derive(Clone)]
pub struct SimSettings {
    inner: Rc<Inner>,
}

impl SettingsStore for SimSettings {
    fn get_double(&self, key: &str) -> HostResult<f64> {
        match self.inner.get(key)? {
            Value::Double(v) => Ok(v),
            _ => Err(HostError::new(format!("{:?} is not a double", key))),
        }
    }

    fn get_strv(&self, key: &str) -> HostResult<Vec<String>> {
        match self.inner.get(key)? {
            Value::Strv(v) => Ok(v),
            _ => Err(HostError::new(format!("{:?} is not a string list", key))),
        }
    }

    fn get_boolean(&self, key: &str) -> HostResult<bool> {
        match self.inner.get(key)? {
            Value::Boolean(v) => Ok(v),
            _ => Err(HostError::new(format!("{:?} is not a boolean", key))),
        }
    }

    fn set_double(&self, key: &str, value: f64) -> HostResult<()> {
        self.inner.set(key, Value::Double(value))
    }

    fn set_strv(&self, key: &str, value: &[String]) -> HostResult<()> {
        self.inner.set(key, Value::Strv(value.to_vec()))
    }

    fn set_boolean(&self, key: &str, value: bool) -> HostResult<()> {
        self.inner.set(key, Value::Boolean(value))
    }

    fn connect_changed(&self, key: &str) -> HostResult<SignalId> {
        if default_value(key).is_none() {
            return Err(HostError::new(format!("no such key {:?}", key)));
        }
        Ok(self
            .inner
            .connect(Connection::SettingChanged(key.to_string())))
    }

    fn disconnect(&self, id: SignalId) -> HostResult<()> {
        self.inner.disconnect(id)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_minimize_notifies_only_connected_windows() {
        let host = setup_host();
        host.minimize(1).unwrap();
        assert_eq!(host.pending_events(), 0);

        let id = host.connect_minimized_changed(1).unwrap();
        host.unminimize(1).unwrap();
        assert_eq!(
            host.next_event(),
            Some(Event::MinimizedChanged { window: 1 })
        );

        host.disconnect(id).unwrap();
        host.minimize(1).unwrap();
        assert_eq!(host.next_event(), None);
    }

    #[test]
    fn test_disconnect_twice_errors() {
        let host = setup_host();
        let id = host.connect_window_created().unwrap();
        assert!(host.disconnect(id).is_ok());
        assert!(host.disconnect(id).is_err());
    }

    #[test]
    fn test_remove_window_drops_its_connections() {
        let host = setup_host();
        host.connect_minimized_changed(2).unwrap();
        host.connect_window_removed().unwrap();
        host.remove_window(2);
        assert_eq!(host.minimized_connections(2), 0);
        assert_eq!(host.next_event(), Some(Event::WindowRemoved { window: 2 }));
    }

    #[test]
    fn test_settings_change_notifies_on_actual_change_only() {
        let host = setup_host();
        let settings = host.settings();
        settings.connect_changed(keys::KEY_RESIZE).unwrap();

        settings.set_strv(keys::KEY_RESIZE, &[]).unwrap();
        assert_eq!(host.pending_events(), 0);

        settings
            .set_strv(keys::KEY_RESIZE, &["<Super>R".to_string()])
            .unwrap();
        assert_eq!(
            host.next_event(),
            Some(Event::SettingChanged {
                key: keys::KEY_RESIZE.to_string()
            })
        );
    }

    #[test]
    fn test_settings_type_mismatch() {
        let host = SimHost::new();
        let settings = host.settings();
        assert!(settings.set_double(keys::KEY_RESIZE, 1.0).is_err());
        assert!(settings.get_boolean(keys::MARGIN_TOP).is_err());
        assert!(settings.get_double("unknown").is_err());
    }

    #[test]
    fn test_keybinding_ids_are_stable_per_name() {
        let host = setup_host();
        let settings = host.settings();
        settings
            .set_strv(keys::RESIZE_BINDING, &["<Super>R".to_string()])
            .unwrap();

        let first = host
            .add_keybinding(keys::RESIZE_BINDING, &settings, BindingMode::Normal)
            .unwrap();
        assert!(first.is_some());
        // Duplicate registration is declined
        assert_eq!(
            host.add_keybinding(keys::RESIZE_BINDING, &settings, BindingMode::Normal)
                .unwrap(),
            None
        );

        host.remove_keybinding(keys::RESIZE_BINDING).unwrap();
        let second = host
            .add_keybinding(keys::RESIZE_BINDING, &settings, BindingMode::Normal)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_press_activates_matching_binding() {
        let host = setup_host();
        let settings = host.settings();
        settings
            .set_strv(keys::MAXIMIZE_BINDING, &["<Super>Up".to_string()])
            .unwrap();
        host.add_keybinding(keys::MAXIMIZE_BINDING, &settings, BindingMode::Normal)
            .unwrap();

        host.press("<Super>Down");
        assert_eq!(host.next_event(), None);
        host.press("<Super>Up");
        assert_eq!(
            host.next_event(),
            Some(Event::KeybindingActivated {
                name: keys::MAXIMIZE_BINDING.to_string()
            })
        );
    }

    #[test]
    fn test_maximize_and_unmaximize_restore_frame() {
        let host = setup_host();
        let before = host.window(2).unwrap().frame;
        host.maximize(2).unwrap();
        assert_eq!(host.window(2).unwrap().frame, full_hd());
        host.unmaximize(2).unwrap();
        assert_eq!(host.window(2).unwrap().frame, before);
    }
}
