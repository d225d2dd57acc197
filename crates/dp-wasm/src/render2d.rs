//! Canvas2D renderer.
//!
//! Mirrors the raster onto an HTML `<canvas>` via
//! `CanvasRenderingContext2d`: background fill, then one solid rect per
//! inked cell.

use dp_core::{CELL_SIZE, Raster};
use web_sys::CanvasRenderingContext2d;

/// Draw the whole raster. The canvas backing store is expected to match
/// the raster size (392×392).
pub fn render_raster(ctx: &CanvasRenderingContext2d, raster: &Raster) {
    let width = raster.width() as f64;
    let height = raster.height() as f64;

    ctx.set_fill_style_str(&raster.background().to_hex());
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_fill_style_str(&raster.brush().to_hex());
    let cell = CELL_SIZE as f64;
    for c in raster.inked_cells() {
        ctx.fill_rect(c.col as f64 * cell, c.row as f64 * cell, cell, cell);
    }
}
