//! Raster surface and grid-aligned brush.
//!
//! The surface is a 392×392 RGBA pixel buffer conceptually divided into a
//! 28×28 grid of 14-pixel cells. Paint operations always fill whole cells,
//! so the raster is fully described by which cells carry ink.

use crate::color::Color;

/// Cells per side of the logical grid.
pub const GRID_SIZE: usize = 28;

/// Side length of one grid cell, in raster pixels.
pub const CELL_SIZE: usize = 14;

/// Side length of the raster, in pixels.
pub const RASTER_SIZE: usize = GRID_SIZE * CELL_SIZE;

/// A cell position on the logical grid. Always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    /// Build a cell from signed coordinates, or `None` if outside the grid.
    pub fn checked(row: i64, col: i64) -> Option<Self> {
        let in_range = |v: i64| (0..GRID_SIZE as i64).contains(&v);
        if in_range(row) && in_range(col) {
            Some(Self {
                row: row as usize,
                col: col as usize,
            })
        } else {
            None
        }
    }

    /// Cell containing the raster point `(x, y)`.
    ///
    /// Returns the unclipped signed `(row, col)`; points left of or above
    /// the raster floor to negative indices.
    pub fn locate(x: f64, y: f64) -> Option<(i64, i64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cell = CELL_SIZE as f64;
        Some(((y / cell).floor() as i64, (x / cell).floor() as i64))
    }
}

/// The drawing surface: pixel buffer plus per-cell ink map.
#[derive(Debug, Clone)]
pub struct Raster {
    pixels: Vec<u8>,
    ink: [[bool; GRID_SIZE]; GRID_SIZE],
    brush: Color,
    background: Color,
}

impl Default for Raster {
    fn default() -> Self {
        Self::new()
    }
}

impl Raster {
    /// A cleared raster with the standard brush and background colors.
    pub fn new() -> Self {
        Self::with_colors(Color::BRUSH, Color::BACKGROUND)
    }

    pub fn with_colors(brush: Color, background: Color) -> Self {
        let mut raster = Self {
            pixels: vec![0; RASTER_SIZE * RASTER_SIZE * 4],
            ink: [[false; GRID_SIZE]; GRID_SIZE],
            brush,
            background,
        };
        raster.clear();
        raster
    }

    pub fn width(&self) -> u32 {
        RASTER_SIZE as u32
    }

    pub fn height(&self) -> u32 {
        RASTER_SIZE as u32
    }

    pub fn brush(&self) -> Color {
        self.brush
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Fill the whole raster with the background color and drop all ink.
    pub fn clear(&mut self) {
        let bg = self.background.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bg);
        }
        self.ink = [[false; GRID_SIZE]; GRID_SIZE];
    }

    /// Paint the 3×3 block of cells centered on the cell under `(x, y)`.
    ///
    /// Neighbors outside the grid are skipped, not wrapped or clamped.
    /// Returns the cells that were painted (possibly none).
    pub fn apply_brush(&mut self, x: f64, y: f64) -> Vec<GridCell> {
        let Some((row, col)) = GridCell::locate(x, y) else {
            return Vec::new();
        };

        let mut painted = Vec::with_capacity(9);
        for dr in -1..=1 {
            for dc in -1..=1 {
                let neighbor = GridCell::checked(row.saturating_add(dr), col.saturating_add(dc));
                if let Some(cell) = neighbor {
                    self.fill_cell(cell);
                    painted.push(cell);
                }
            }
        }
        log::trace!(
            "BRUSH ({x:.1}, {y:.1}) -> cell ({row}, {col}), {} painted",
            painted.len()
        );
        painted
    }

    /// Fill one cell solid with the brush color.
    pub fn fill_cell(&mut self, cell: GridCell) {
        let color = self.brush.to_rgba8();
        let x0 = cell.col * CELL_SIZE;
        let y0 = cell.row * CELL_SIZE;
        for y in y0..y0 + CELL_SIZE {
            let start = (y * RASTER_SIZE + x0) * 4;
            for px in self.pixels[start..start + CELL_SIZE * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
        self.ink[cell.row][cell.col] = true;
    }

    pub fn is_inked(&self, cell: GridCell) -> bool {
        self.ink[cell.row][cell.col]
    }

    /// All inked cells, row-major.
    pub fn inked_cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..GRID_SIZE).flat_map(move |row| {
            (0..GRID_SIZE)
                .filter(move |&col| self.ink[row][col])
                .map(move |col| GridCell { row, col })
        })
    }

    /// The grid as 0.0 / 1.0 intensities, row-major (28×28).
    pub fn intensity_grid(&self) -> Vec<f32> {
        self.ink
            .iter()
            .flat_map(|row| row.iter().map(|&inked| if inked { 1.0 } else { 0.0 }))
            .collect()
    }

    /// Raw RGBA8 pixel data, row-major, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color of the pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= RASTER_SIZE || y >= RASTER_SIZE {
            return None;
        }
        let i = (y * RASTER_SIZE + x) * 4;
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn block(row: i64, col: i64) -> BTreeSet<GridCell> {
        let mut out = BTreeSet::new();
        for dr in -1..=1 {
            for dc in -1..=1 {
                if let Some(c) = GridCell::checked(row + dr, col + dc) {
                    out.insert(c);
                }
            }
        }
        out
    }

    fn center_of(row: usize, col: usize) -> (f64, f64) {
        let half = CELL_SIZE as f64 / 2.0;
        (
            (col * CELL_SIZE) as f64 + half,
            (row * CELL_SIZE) as f64 + half,
        )
    }

    #[test]
    fn new_raster_is_background() {
        let raster = Raster::new();
        assert_eq!(raster.inked_cells().count(), 0);
        assert_eq!(raster.pixel(0, 0), Some(Color::BACKGROUND));
        assert_eq!(
            raster.pixel(RASTER_SIZE - 1, RASTER_SIZE - 1),
            Some(Color::BACKGROUND)
        );
        assert_eq!(raster.pixels().len(), RASTER_SIZE * RASTER_SIZE * 4);
    }

    #[test]
    fn interior_brush_paints_full_block() {
        let mut raster = Raster::new();
        let (x, y) = center_of(10, 12);
        let painted = raster.apply_brush(x, y);
        assert_eq!(painted.len(), 9);
        let inked: BTreeSet<_> = raster.inked_cells().collect();
        assert_eq!(inked, block(10, 12));
    }

    #[test]
    fn painted_set_is_clipped_block_for_every_cell() {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let mut raster = Raster::new();
                let (x, y) = center_of(row, col);
                raster.apply_brush(x, y);
                let inked: BTreeSet<_> = raster.inked_cells().collect();
                assert_eq!(inked, block(row as i64, col as i64), "cell ({row}, {col})");
            }
        }
    }

    #[test]
    fn corner_brush_is_clipped() {
        let mut raster = Raster::new();
        assert_eq!(raster.apply_brush(0.0, 0.0).len(), 4);

        let mut raster = Raster::new();
        let edge = RASTER_SIZE as f64 - 0.5;
        assert_eq!(raster.apply_brush(edge, edge).len(), 4);
    }

    #[test]
    fn brush_just_outside_reaches_edge_cells() {
        // (-1, -1) floors to cell (-1, -1); only (0, 0) survives clipping.
        let mut raster = Raster::new();
        let painted = raster.apply_brush(-1.0, -1.0);
        assert_eq!(painted, vec![GridCell { row: 0, col: 0 }]);
    }

    #[test]
    fn brush_far_outside_paints_nothing() {
        let mut raster = Raster::new();
        assert!(raster.apply_brush(-100.0, 50.0).is_empty());
        assert!(raster.apply_brush(5000.0, 5000.0).is_empty());
        assert!(raster.apply_brush(f64::NAN, 3.0).is_empty());
        assert!(raster.apply_brush(f64::INFINITY, 3.0).is_empty());
        assert!(raster.apply_brush(1e300, -1e300).is_empty());
        assert_eq!(raster.inked_cells().count(), 0);
    }

    #[test]
    fn painted_cells_fill_pixels_with_brush() {
        let mut raster = Raster::new();
        raster.fill_cell(GridCell { row: 2, col: 3 });
        let x0 = 3 * CELL_SIZE;
        let y0 = 2 * CELL_SIZE;
        assert_eq!(raster.pixel(x0, y0), Some(Color::BRUSH));
        assert_eq!(
            raster.pixel(x0 + CELL_SIZE - 1, y0 + CELL_SIZE - 1),
            Some(Color::BRUSH)
        );
        assert_eq!(raster.pixel(x0 + CELL_SIZE, y0), Some(Color::BACKGROUND));
        assert_eq!(raster.pixel(x0 - 1, y0), Some(Color::BACKGROUND));
    }

    #[test]
    fn clear_restores_background() {
        let mut raster = Raster::new();
        let (x, y) = center_of(14, 14);
        raster.apply_brush(x, y);
        raster.clear();
        assert_eq!(raster.inked_cells().count(), 0);
        assert!(
            raster
                .pixels()
                .chunks_exact(4)
                .all(|p| p == Color::BACKGROUND.to_rgba8())
        );
    }

    #[test]
    fn intensity_grid_marks_ink() {
        let mut raster = Raster::new();
        raster.fill_cell(GridCell { row: 0, col: 1 });
        let grid = raster.intensity_grid();
        assert_eq!(grid.len(), GRID_SIZE * GRID_SIZE);
        assert_eq!(grid[1], 1.0);
        assert_eq!(grid.iter().filter(|&&v| v > 0.0).count(), 1);
    }
}
