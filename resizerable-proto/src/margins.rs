use serde::{Deserialize, Serialize};

/// Default margin on every side, as a fraction of the work area.
pub const DEFAULT_MARGIN: f64 = 0.2;

/// Per-side margins as fractions of the monitor work area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::all(DEFAULT_MARGIN)
    }
}

impl Margins {
    pub fn all(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn vertical_horizontal(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Parse 1, 2 or 4 fractions in top/right/bottom/left order.
    pub fn from_args(args: &[String]) -> Option<Self> {
        let values: Vec<f64> = args
            .iter()
            .map(|a| a.parse().ok())
            .collect::<Option<Vec<f64>>>()?;
        match values.as_slice() {
            [all] => Some(Self::all(*all)),
            [v, h] => Some(Self::vertical_horizontal(*v, *h)),
            [top, right, bottom, left] => Some(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => None,
        }
    }

    /// Build margins from the 0-100 percent view used by preference front-ends.
    pub fn from_percent(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: top / 100.0,
            right: right / 100.0,
            bottom: bottom / 100.0,
            left: left / 100.0,
        }
    }

    /// Percent view in top/right/bottom/left order.
    pub fn to_percent(&self) -> [f64; 4] {
        [
            self.top * 100.0,
            self.right * 100.0,
            self.bottom * 100.0,
            self.left * 100.0,
        ]
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Clamp every side into `[0, 1)`. Non-finite values become 0.
    ///
    /// Sums of opposite sides may still reach 1 or more; the geometry
    /// floor handles that case.
    pub fn sanitized(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if !v.is_finite() {
                return 0.0;
            }
            v.clamp(0.0, 1.0 - f64::EPSILON)
        }
        Self {
            top: clamp(self.top),
            right: clamp(self.right),
            bottom: clamp(self.bottom),
            left: clamp(self.left),
        }
    }
}

impl std::fmt::Display for Margins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.top, self.right, self.bottom, self.left
        )
    }
}
