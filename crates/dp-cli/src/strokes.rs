//! Stroke scripts: recorded pointer paths replayed through the controller.
//!
//! ```json
//! {
//!   "display": { "left": 0, "top": 0, "width": 392, "height": 392 },
//!   "strokes": [[[196, 60], [196, 120], [196, 330]]]
//! }
//! ```
//!
//! Each stroke is a press at its first point, a move to every following
//! point, then a release. Points are client coordinates relative to
//! `display` (omitted: the raster shown 1:1 at the origin).

use anyhow::{Context, Result};
use dp_core::SurfaceRect;
use dp_editor::{InputEvent, PointerSample, SurfaceController};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct StrokeScript {
    #[serde(default)]
    pub display: Option<SurfaceRect>,
    pub strokes: Vec<Vec<[f64; 2]>>,
}

impl StrokeScript {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid stroke script")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Input events for the whole script, in order.
    pub fn events(&self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for stroke in self.strokes.iter().filter(|s| !s.is_empty()) {
            let mut points = stroke.iter().map(|&[x, y]| PointerSample::mouse(x, y));
            if let Some(first) = points.next() {
                events.push(InputEvent::PressStart(first));
            }
            events.extend(points.map(InputEvent::Move));
            events.push(InputEvent::Release);
        }
        events
    }

    /// Drive `controller` through every stroke.
    pub fn replay(&self, controller: &mut SurfaceController) {
        if let Some(rect) = self.display {
            controller.set_display_rect(rect);
        }
        let events = self.events();
        log::debug!(
            "replaying {} strokes ({} events)",
            self.strokes.len(),
            events.len()
        );
        for event in &events {
            controller.handle(event);
        }
    }
}
