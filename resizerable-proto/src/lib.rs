pub mod event;
pub mod geometry;
pub mod margins;
pub mod scenario;
pub mod settings;

pub use event::{EventFilter, ResizerEvent};
pub use geometry::{Rect, WindowId, WorkArea};
pub use margins::Margins;
pub use scenario::{Scenario, ScenarioStep, SettingsSeed, WindowSpec};
pub use settings::{keys, Action};
