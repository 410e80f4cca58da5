use crate::core::read_margins;
use crate::effect::Effect;
use crate::error::Result;
use crate::event_emitter::EventEmitter;
use crate::platform::{SettingsStore, WindowManipulator, WindowSystem};
use resizerable_proto::{Rect, WindowId};

use super::effects::execute_effects;
use super::smart_minimize::Measurement;

#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    Resized { window: WindowId, target: Rect },
    Minimized { window: WindowId },
}

/// Maximize the focused window if the host allows it.
pub fn maximize_window<W: WindowSystem + WindowManipulator>(
    wm: &W,
    event_emitter: &EventEmitter,
) -> Result<Option<WindowId>> {
    let Some(window) = wm.focused_window() else {
        tracing::debug!("Maximize requested without a focused window");
        return Ok(None);
    };
    if !wm.can_maximize(window)? {
        tracing::debug!("Window {} cannot be maximized", window);
        return Ok(None);
    }
    execute_effects(vec![Effect::Maximize { window }], wm, event_emitter)?;
    Ok(Some(window))
}

/// Resize the focused window to the margin target, or minimize it when it
/// is already no larger than the target.
pub fn resize_window<W: WindowSystem + WindowManipulator, S: SettingsStore>(
    wm: &W,
    settings: &S,
    event_emitter: &EventEmitter,
) -> Result<Option<ResizeOutcome>> {
    let Some(window) = wm.focused_window() else {
        tracing::debug!("Resize requested without a focused window");
        return Ok(None);
    };

    let measurement = Measurement::capture(wm, window, &read_margins(settings))?;
    if measurement.exceeds_target() {
        tracing::info!(
            "Resizing window {} from {} to {}",
            window,
            measurement.frame,
            measurement.target
        );
        execute_effects(measurement.resize_effects(), wm, event_emitter)?;
        Ok(Some(ResizeOutcome::Resized {
            window,
            target: measurement.target,
        }))
    } else {
        tracing::info!(
            "Window {} already within margins ({} <= {}), minimizing",
            window,
            measurement.current_area(),
            measurement.target_area()
        );
        execute_effects(vec![Effect::Minimize { window }], wm, event_emitter)?;
        Ok(Some(ResizeOutcome::Minimized { window }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResizerError;
    use crate::sim::fixtures::{create_test_window, full_hd, setup_host};
    use crate::sim::{HostCall, SimHost};
    use resizerable_proto::{keys, Margins, ResizerEvent, WindowSpec};
    use std::sync::mpsc as std_mpsc;

    fn emitter() -> (EventEmitter, std_mpsc::Receiver<ResizerEvent>) {
        let (tx, rx) = std_mpsc::channel();
        (EventEmitter::new(tx), rx)
    }

    #[test]
    fn test_maximize_focused_window() {
        let host = setup_host();
        let (emitter, rx) = emitter();

        assert_eq!(maximize_window(&host, &emitter), Ok(Some(1)));
        assert!(host.window(1).unwrap().maximized);
        assert_eq!(
            rx.try_recv().unwrap(),
            ResizerEvent::WindowMaximized { window_id: 1 }
        );
    }

    #[test]
    fn test_maximize_respects_can_maximize() {
        let spec = WindowSpec {
            can_maximize: false,
            focused: true,
            ..create_test_window(5, 400, 300)
        };
        let host = SimHost::new()
            .with_monitors(vec![full_hd()])
            .with_windows(vec![spec]);
        let (emitter, _rx) = emitter();

        assert_eq!(maximize_window(&host, &emitter), Ok(None));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_maximize_without_focus_is_noop() {
        let host = setup_host().with_focused(None);
        let (emitter, _rx) = emitter();
        assert_eq!(maximize_window(&host, &emitter), Ok(None));
    }

    #[test]
    fn test_resize_large_window_to_margins() {
        let host = setup_host();
        let settings = host.settings();
        let (emitter, _rx) = emitter();
        settings.set_double(keys::MARGIN_LEFT, 0.1).unwrap();
        settings.set_double(keys::MARGIN_RIGHT, 0.1).unwrap();
        settings.set_double(keys::MARGIN_TOP, 0.1).unwrap();
        settings.set_double(keys::MARGIN_BOTTOM, 0.1).unwrap();

        let outcome = resize_window(&host, &settings, &emitter).unwrap();

        let target = Rect::new(192, 108, 1536, 864);
        assert_eq!(outcome, Some(ResizeOutcome::Resized { window: 1, target }));
        assert_eq!(host.window(1).unwrap().frame, target);
        assert_eq!(
            host.calls(),
            vec![HostCall::MoveResize {
                window: 1,
                rect: target
            }]
        );
    }

    #[test]
    fn test_resize_small_window_minimizes() {
        let host = setup_host().with_focused(Some(2));
        let settings = host.settings();
        let (emitter, _rx) = emitter();

        let outcome = resize_window(&host, &settings, &emitter).unwrap();

        assert_eq!(outcome, Some(ResizeOutcome::Minimized { window: 2 }));
        assert!(host.window(2).unwrap().minimized);
    }

    #[test]
    fn test_resize_maximized_window_unmaximizes_first() {
        let spec = WindowSpec {
            maximized: true,
            focused: true,
            frame: full_hd(),
            ..create_test_window(4, 0, 0)
        };
        let host = SimHost::new()
            .with_monitors(vec![full_hd()])
            .with_windows(vec![spec]);
        let settings = host.settings();
        let (emitter, _rx) = emitter();

        resize_window(&host, &settings, &emitter).unwrap();

        let expected = crate::core::target_rect(&full_hd(), &Margins::default());
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Unmaximize(4),
                HostCall::MoveResize {
                    window: 4,
                    rect: expected
                },
            ]
        );
        let window = host.window(4).unwrap();
        assert!(!window.maximized);
        assert_eq!(window.frame, expected);
    }

    #[test]
    fn test_resize_with_unknown_monitor_is_abandoned() {
        let spec = WindowSpec {
            monitor: Some(3),
            focused: true,
            ..create_test_window(6, 1900, 1000)
        };
        let host = SimHost::new()
            .with_monitors(vec![full_hd()])
            .with_windows(vec![spec]);
        let settings = host.settings();
        let (emitter, _rx) = emitter();

        let result = resize_window(&host, &settings, &emitter);

        assert_eq!(result, Err(ResizerError::MissingMonitor(6)));
        assert!(host.calls().is_empty());
    }
}
