use crate::core::{read_margins, read_smart_minimize, target_rect};
use crate::effect::{resize_to_margins, Effect};
use crate::error::{ResizerError, Result};
use crate::event_emitter::EventEmitter;
use crate::platform::{SettingsStore, WindowManipulator, WindowSystem};
use resizerable_proto::{Margins, Rect, WindowId};

use super::effects::execute_effects;

/// A window's size against its margin target, captured before any mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub window: WindowId,
    pub frame: Rect,
    pub maximized: bool,
    pub target: Rect,
}

impl Measurement {
    pub fn capture<W: WindowSystem>(wm: &W, window: WindowId, margins: &Margins) -> Result<Self> {
        let invalid = |_| ResizerError::InvalidWindow(window);
        let frame = wm.frame_rect(window).map_err(invalid)?;
        let maximized = wm.is_maximized(window).map_err(invalid)?;
        let work_area = wm
            .monitor_index(window)
            .map_err(invalid)?
            .and_then(|monitor| wm.work_area(monitor))
            .ok_or(ResizerError::MissingMonitor(window))?;

        Ok(Self {
            window,
            frame,
            maximized,
            target: target_rect(&work_area, margins),
        })
    }

    pub fn current_area(&self) -> u64 {
        self.frame.area()
    }

    pub fn target_area(&self) -> u64 {
        self.target.area()
    }

    /// Strictly larger than the margin target; equal areas do not count.
    pub fn exceeds_target(&self) -> bool {
        self.current_area() > self.target_area()
    }

    pub fn resize_effects(&self) -> Vec<Effect> {
        resize_to_margins(self.window, self.target, self.maximized)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The window was unminimized; nothing to decide.
    NotMinimized,
    /// Smart minimize is switched off; the minimize stands.
    Disabled,
    /// The window could not be measured; the minimize stands.
    Aborted(ResizerError),
    Allowed {
        current_area: u64,
        target_area: u64,
    },
    Vetoed {
        current_area: u64,
        target_area: u64,
        target: Rect,
    },
}

pub struct Decision {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Decision {
    fn no_action(outcome: Outcome) -> Self {
        Self {
            outcome,
            effects: vec![],
        }
    }
}

/// Decide what to do about a minimized-state change of `window`.
pub fn decide<W: WindowSystem, S: SettingsStore>(
    wm: &W,
    settings: &S,
    window: WindowId,
) -> Decision {
    match wm.is_minimized(window) {
        Ok(true) => {}
        Ok(false) => return Decision::no_action(Outcome::NotMinimized),
        Err(_) => return Decision::no_action(Outcome::Aborted(ResizerError::InvalidWindow(window))),
    }

    if !read_smart_minimize(settings) {
        return Decision::no_action(Outcome::Disabled);
    }

    let measurement = match Measurement::capture(wm, window, &read_margins(settings)) {
        Ok(m) => m,
        Err(e) => return Decision::no_action(Outcome::Aborted(e)),
    };

    let current_area = measurement.current_area();
    let target_area = measurement.target_area();
    if !measurement.exceeds_target() {
        return Decision::no_action(Outcome::Allowed {
            current_area,
            target_area,
        });
    }

    let mut effects = vec![Effect::Unminimize { window }];
    effects.extend(measurement.resize_effects());
    Decision {
        outcome: Outcome::Vetoed {
            current_area,
            target_area,
            target: measurement.target,
        },
        effects,
    }
}

/// Handle one minimized-state notification: decide, report, then apply.
///
/// Notifications are delivered one at a time, so the change caused by our
/// own `unminimize` arrives after this returns and reads as `NotMinimized`.
pub fn on_minimized_changed<W: WindowSystem + WindowManipulator, S: SettingsStore>(
    wm: &W,
    settings: &S,
    window: WindowId,
    event_emitter: &EventEmitter,
) -> Outcome {
    let decision = decide(wm, settings, window);

    match &decision.outcome {
        Outcome::NotMinimized | Outcome::Disabled => {}
        Outcome::Aborted(e) => {
            tracing::warn!("Smart minimize abandoned: {}", e);
        }
        Outcome::Allowed {
            current_area,
            target_area,
        } => {
            tracing::debug!(
                "Window {} area {} <= target {}, minimize stands",
                window,
                current_area,
                target_area
            );
            event_emitter.emit_minimize_allowed(window, *current_area, *target_area);
        }
        Outcome::Vetoed {
            current_area,
            target_area,
            target,
        } => {
            tracing::info!(
                "Window {} area {} > target {}, resizing to {} instead of minimizing",
                window,
                current_area,
                target_area,
                target
            );
            event_emitter.emit_minimize_vetoed(window, *current_area, *target_area);
        }
    }

    if let Err(e) = execute_effects(decision.effects, wm, event_emitter) {
        tracing::warn!("Smart minimize for window {} incomplete: {}", window, e);
    }
    decision.outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures::{create_test_window, full_hd};
    use crate::platform::WindowSignals;
    use crate::sim::{HostCall, SimHost};
    use resizerable_proto::{keys, ResizerEvent, WindowSpec};
    use std::sync::mpsc as std_mpsc;

    // 1500x1000 is exactly the target for 1920x1080 with these margins
    fn target_margins() -> Margins {
        Margins {
            top: 1.0 - 1000.0 / 1080.0,
            right: 0.0,
            bottom: 0.0,
            left: 1.0 - 1500.0 / 1920.0,
        }
    }

    fn setup(window: WindowSpec, smart: bool) -> (SimHost, crate::sim::SimSettings) {
        let host = SimHost::new()
            .with_monitors(vec![full_hd()])
            .with_windows(vec![window]);
        let settings = host.settings();
        let m = target_margins();
        settings.set_double(keys::MARGIN_TOP, m.top).unwrap();
        settings.set_double(keys::MARGIN_RIGHT, m.right).unwrap();
        settings.set_double(keys::MARGIN_BOTTOM, m.bottom).unwrap();
        settings.set_double(keys::MARGIN_LEFT, m.left).unwrap();
        settings.set_boolean(keys::SMART_MINIMIZE, smart).unwrap();
        (host, settings)
    }

    fn emitter() -> (EventEmitter, std_mpsc::Receiver<ResizerEvent>) {
        let (tx, rx) = std_mpsc::channel();
        (EventEmitter::new(tx), rx)
    }

    fn minimized(id: WindowId, width: u32, height: u32) -> WindowSpec {
        WindowSpec {
            minimized: true,
            ..create_test_window(id, width, height)
        }
    }

    #[test]
    fn test_target_margins_produce_expected_area() {
        let (host, settings) = setup(minimized(1, 10, 10), true);
        let m = Measurement::capture(&host, 1, &read_margins(&settings)).unwrap();
        assert_eq!(m.target_area(), 1_500_000);
    }

    #[test]
    fn test_large_window_minimize_is_vetoed() {
        let (host, settings) = setup(minimized(1, 2000, 1000), true);
        let (emitter, rx) = emitter();
        let outcome = on_minimized_changed(&host, &settings, 1, &emitter);

        assert!(matches!(
            outcome,
            Outcome::Vetoed {
                current_area: 2_000_000,
                target_area: 1_500_000,
                ..
            }
        ));
        let window = host.window(1).unwrap();
        assert!(!window.minimized);
        assert_eq!(window.frame.area(), 1_500_000);

        let calls = host.calls();
        assert_eq!(calls[0], HostCall::Unminimize(1));
        assert!(matches!(calls[1], HostCall::MoveResize { window: 1, .. }));
        assert!(rx
            .try_iter()
            .any(|e| matches!(e, ResizerEvent::MinimizeVetoed { window_id: 1, .. })));
    }

    #[test]
    fn test_small_window_minimize_stands() {
        let (host, settings) = setup(minimized(1, 1000, 1000), true);
        let (emitter, _rx) = emitter();
        let outcome = on_minimized_changed(&host, &settings, 1, &emitter);

        assert_eq!(
            outcome,
            Outcome::Allowed {
                current_area: 1_000_000,
                target_area: 1_500_000
            }
        );
        assert!(host.window(1).unwrap().minimized);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_equal_area_minimize_stands() {
        let (host, settings) = setup(minimized(1, 1500, 1000), true);
        let decision = decide(&host, &settings, 1);
        assert!(matches!(decision.outcome, Outcome::Allowed { .. }));
        assert!(decision.effects.is_empty());
    }

    #[test]
    fn test_disabled_smart_minimize_takes_no_action() {
        let (host, settings) = setup(minimized(1, 2000, 1000), false);
        let decision = decide(&host, &settings, 1);
        assert_eq!(decision.outcome, Outcome::Disabled);
        assert!(decision.effects.is_empty());
    }

    #[test]
    fn test_unminimize_after_veto_is_not_reevaluated() {
        let (host, settings) = setup(minimized(1, 2000, 1000), true);
        let (emitter, _rx) = emitter();
        host.connect_minimized_changed(1).unwrap();

        on_minimized_changed(&host, &settings, 1, &emitter);
        let resized = host.window(1).unwrap().frame;
        assert_eq!(
            host.next_event(),
            Some(crate::event::Event::MinimizedChanged { window: 1 })
        );
        host.clear_calls();

        let outcome = on_minimized_changed(&host, &settings, 1, &emitter);

        assert_eq!(outcome, Outcome::NotMinimized);
        assert!(host.calls().is_empty());
        assert_eq!(host.window(1).unwrap().frame, resized);
    }

    #[test]
    fn test_unminimized_window_is_ignored() {
        let (host, settings) = setup(create_test_window(1, 2000, 1000), true);
        let decision = decide(&host, &settings, 1);
        assert_eq!(decision.outcome, Outcome::NotMinimized);
    }

    #[test]
    fn test_missing_monitor_leaves_window_minimized() {
        let spec = WindowSpec {
            monitor: None,
            ..minimized(1, 2000, 1000)
        };
        let (host, settings) = setup(spec, true);
        let (emitter, _rx) = emitter();
        let outcome = on_minimized_changed(&host, &settings, 1, &emitter);

        assert_eq!(outcome, Outcome::Aborted(ResizerError::MissingMonitor(1)));
        assert!(host.window(1).unwrap().minimized);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_maximized_window_is_unmaximized_before_resize() {
        let spec = WindowSpec {
            maximized: true,
            frame: full_hd(),
            ..minimized(1, 0, 0)
        };
        let (host, settings) = setup(spec, true);
        let decision = decide(&host, &settings, 1);

        assert_eq!(decision.effects.len(), 3);
        assert_eq!(decision.effects[0], Effect::Unminimize { window: 1 });
        assert_eq!(decision.effects[1], Effect::Unmaximize { window: 1 });
        assert!(matches!(decision.effects[2], Effect::MoveResize { window: 1, .. }));
    }
}
