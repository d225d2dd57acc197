//! Client (CSS) coordinates → raster coordinates.
//!
//! The surface may be displayed at a different size than its backing
//! raster; pointer positions are rescaled from the on-screen box.

use serde::{Deserialize, Serialize};

/// On-screen bounding box of the surface, as reported by
/// `getBoundingClientRect()` or the native windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A box displayed 1:1 at the origin.
    pub const fn identity(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Map a client-space point into raster space.
///
/// `canvas = (client - origin) * (raster / display)` on each axis. A
/// degenerate (zero-size) display box yields non-finite coordinates, which
/// the brush treats as off-surface.
pub fn map_client_point(
    client_x: f64,
    client_y: f64,
    rect: SurfaceRect,
    raster_width: f64,
    raster_height: f64,
) -> (f64, f64) {
    let scale_x = raster_width / rect.width;
    let scale_y = raster_height / rect.height;
    (
        (client_x - rect.left) * scale_x,
        (client_y - rect.top) * scale_y,
    )
}
