use crate::effect::Effect;
use crate::error::{ResizerError, Result};
use crate::event_emitter::EventEmitter;
use crate::platform::WindowManipulator;

/// Execute side effects.
///
/// Effects on one window depend on each other, so the first failing host
/// call stops the sequence.
pub fn execute_effects<M: WindowManipulator>(
    effects: Vec<Effect>,
    manipulator: &M,
    event_emitter: &EventEmitter,
) -> Result<()> {
    for effect in effects {
        let window = effect.window();
        tracing::debug!("Applying {:?}", effect);
        let result = match effect {
            Effect::Unminimize { window } => manipulator.unminimize(window),
            Effect::Unmaximize { window } => manipulator.unmaximize(window),
            Effect::MoveResize { window, rect } => manipulator
                .move_resize_frame(window, false, rect)
                .map(|()| event_emitter.emit_window_resized(window, rect)),
            Effect::Minimize { window } => manipulator
                .minimize(window)
                .map(|()| event_emitter.emit_window_minimized(window)),
            Effect::Maximize { window } => manipulator
                .maximize(window)
                .map(|()| event_emitter.emit_window_maximized(window)),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to apply effect to window {}: {}", window, e);
            return Err(ResizerError::Host(e));
        }
    }
    Ok(())
}
