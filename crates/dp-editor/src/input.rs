//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` enum
//! consumed by the surface controller.

use dp_core::SurfaceRect;
use dp_core::coords::map_client_point;

/// Where a pointer event was reported, in client (CSS) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSample {
    /// Mouse events carry their own position.
    Mouse { client_x: f64, client_y: f64 },
    /// Touch events carry the active touch list; only the first is used.
    Touch { touches: Vec<(f64, f64)> },
}

impl PointerSample {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self::Mouse { client_x, client_y }
    }

    pub fn touch(client_x: f64, client_y: f64) -> Self {
        Self::Touch {
            touches: vec![(client_x, client_y)],
        }
    }

    /// Client position of the sample: the mouse position, or the first touch.
    pub fn client_position(&self) -> Option<(f64, f64)> {
        match self {
            Self::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            Self::Touch { touches } => touches.first().copied(),
        }
    }

    /// Position in raster space given the surface's on-screen box.
    pub fn raster_position(
        &self,
        rect: SurfaceRect,
        raster_width: f64,
        raster_height: f64,
    ) -> Option<(f64, f64)> {
        let (x, y) = self.client_position()?;
        Some(map_client_point(x, y, rect, raster_width, raster_height))
    }
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse down / touch start.
    PressStart(PointerSample),
    /// Mouse move / touch move.
    Move(PointerSample),
    /// Mouse up / touch end.
    Release,
    /// Pointer left the surface.
    Leave,
}

impl InputEvent {
    /// Map a DOM event type name to an event. Returns `None` for names the
    /// surface doesn't listen to, or when a positional event has no sample.
    pub fn from_dom(kind: &str, sample: Option<PointerSample>) -> Option<Self> {
        match kind {
            "mousedown" | "touchstart" => Some(Self::PressStart(sample?)),
            "mousemove" | "touchmove" => Some(Self::Move(sample?)),
            "mouseup" | "touchend" | "touchcancel" => Some(Self::Release),
            "mouseleave" => Some(Self::Leave),
            _ => None,
        }
    }

    pub fn sample(&self) -> Option<&PointerSample> {
        match self {
            Self::PressStart(s) | Self::Move(s) => Some(s),
            Self::Release | Self::Leave => None,
        }
    }
}
