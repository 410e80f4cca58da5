use resizerable_proto::{Rect, WindowId};

/// Window mutation requested by a decision, applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Unminimize { window: WindowId },
    Unmaximize { window: WindowId },
    MoveResize { window: WindowId, rect: Rect },
    Minimize { window: WindowId },
    Maximize { window: WindowId },
}

impl Effect {
    pub fn window(&self) -> WindowId {
        match self {
            Effect::Unminimize { window }
            | Effect::Unmaximize { window }
            | Effect::MoveResize { window, .. }
            | Effect::Minimize { window }
            | Effect::Maximize { window } => *window,
        }
    }
}

/// Effects that put `window` at `target`, leaving the maximized state first.
pub fn resize_to_margins(window: WindowId, target: Rect, maximized: bool) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if maximized {
        effects.push(Effect::Unmaximize { window });
    }
    effects.push(Effect::MoveResize {
        window,
        rect: target,
    });
    effects
}
