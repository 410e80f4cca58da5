use resizerable_proto::{Margins, Rect, WorkArea};

/// Absolute minimum usable window size on either axis.
pub const MIN_WINDOW_SIZE: u32 = 100;

/// Rectangle a window occupies when resized to the configured margins.
///
/// The size floor wins over margin arithmetic: margins summing to 1 or more
/// still yield a `MIN_WINDOW_SIZE` window that may overlap the margin region.
pub fn target_rect(work_area: &WorkArea, margins: &Margins) -> Rect {
    let width = work_area.width as f64;
    let height = work_area.height as f64;

    let x = offset(work_area.x, width * margins.left);
    let y = offset(work_area.y, height * margins.top);
    let new_width = (width * (1.0 - margins.left - margins.right)).round() as i64;
    let new_height = (height * (1.0 - margins.top - margins.bottom)).round() as i64;

    Rect {
        x,
        y,
        width: floor_size(new_width),
        height: floor_size(new_height),
    }
}

pub fn target_area(work_area: &WorkArea, margins: &Margins) -> u64 {
    target_rect(work_area, margins).area()
}

/// Origin shifted by a margin, saturating at the edges of the coordinate space.
fn offset(origin: i32, margin: f64) -> i32 {
    (origin as i64 + margin.round() as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn floor_size(size: i64) -> u32 {
    size.clamp(MIN_WINDOW_SIZE as i64, u32::MAX as i64) as u32
}
