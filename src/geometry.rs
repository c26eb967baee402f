use druid::kurbo::{Point, Size};

/// A point in normalized map space, nominally within [0,1] on each axis.
/// Map coordinates are resolution-independent; consumers scale them by
/// their own viewport size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

/// A point in pixel coordinates of the active canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        MapPoint { x, y }
    }

    /// Converts to pixel coordinates by scaling against the canvas size.
    pub fn to_screen(self, size: Size) -> ScreenPoint {
        ScreenPoint {
            x: self.x * size.width,
            y: self.y * size.height,
        }
    }

    /// Snaps both axes to the nearest multiple of `1/grid_size`.
    pub fn snapped(self, grid_size: u32) -> MapPoint {
        MapPoint {
            x: snap_nearest(self.x, grid_size),
            y: snap_nearest(self.y, grid_size),
        }
    }
}

impl ScreenPoint {
    /// Converts to normalized map coordinates. The canvas size must be
    /// nonzero on both axes, which druid guarantees for a live window.
    pub fn to_map(self, size: Size) -> MapPoint {
        MapPoint {
            x: self.x / size.width,
            y: self.y / size.height,
        }
    }
}

impl From<Point> for ScreenPoint {
    fn from(p: Point) -> Self {
        ScreenPoint { x: p.x, y: p.y }
    }
}

impl From<ScreenPoint> for Point {
    fn from(p: ScreenPoint) -> Self {
        Point::new(p.x, p.y)
    }
}

/// Quantizes `n` to the nearest multiple of `1/grid_size`.
pub fn snap_nearest(n: f64, grid_size: u32) -> f64 {
    let g = f64::from(grid_size);
    (n * g).round() / g
}

/// Quantizes `n` downward to a multiple of `1/grid_size`. Alternative
/// snapping policy ("snap down" instead of "snap nearest"); the editor
/// itself only uses [`snap_nearest`].
pub fn snap_down(n: f64, grid_size: u32) -> f64 {
    let g = f64::from(grid_size);
    (n * g).floor() / g
}
