mod geometry;
mod preferences;

pub use geometry::*;
pub use preferences::*;
