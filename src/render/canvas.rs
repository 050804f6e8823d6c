//! Character-grid drawing surface.
//!
//! A [`Canvas`] is only reachable through a [`Surface`] guard obtained from a
//! [`SurfaceTracker`]. The guard counts itself as live until dropped, which
//! lets the renderer (and its tests) check that no surface survives the step
//! that created it.

use std::cell::Cell;
use std::ops::{Deref, DerefMut};

use crossterm::style::{self, Stylize};

use crate::model::ChartBounds;
use crate::variants::Color;

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridCell {
    glyph: char,
    color: Option<Color>,
}

const BLANK: GridCell = GridCell { glyph: ' ', color: None };

/// Fixed-size grid mapped onto chart coordinates.
#[derive(Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    bounds: ChartBounds,
    cells: Vec<GridCell>,
}

impl Canvas {
    fn new(width: usize, height: usize, bounds: ChartBounds) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        Self {
            width,
            height,
            bounds,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> &ChartBounds {
        &self.bounds
    }

    fn column(&self, x: f64) -> Option<usize> {
        let span = self.bounds.x_max - self.bounds.x_min;
        let span = if span > 0.0 { span } else { 1.0 };
        let pos = (x - self.bounds.x_min) / span * (self.width - 1) as f64;
        (pos.is_finite() && pos >= -0.5 && pos <= (self.width - 1) as f64 + 0.5)
            .then(|| pos.round().clamp(0.0, (self.width - 1) as f64) as usize)
    }

    /// Row 0 is the top of the chart (largest height).
    pub fn row(&self, y: f64) -> Option<usize> {
        let span = self.bounds.y_max - self.bounds.y_min;
        let span = if span > 0.0 { span } else { 1.0 };
        let pos = (self.bounds.y_max - y) / span * (self.height - 1) as f64;
        (pos.is_finite() && pos >= -0.5 && pos <= (self.height - 1) as f64 + 0.5)
            .then(|| pos.round().clamp(0.0, (self.height - 1) as f64) as usize)
    }

    /// Draws a glyph at chart coordinates. Points outside the bounds are skipped.
    pub fn plot(&mut self, x: f64, y: f64, glyph: char, color: Color) {
        if let (Some(col), Some(row)) = (self.column(x), self.row(y)) {
            self.cells[row * self.width + col] = GridCell { glyph, color: Some(color) };
        }
    }

    /// Draws a horizontal line across empty cells only.
    pub fn hline(&mut self, y: f64, glyph: char, color: Color) {
        if let Some(row) = self.row(y) {
            for cell in &mut self.cells[row * self.width..(row + 1) * self.width] {
                if *cell == BLANK {
                    *cell = GridCell { glyph, color: Some(color) };
                }
            }
        }
    }

    pub fn glyph_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.cells[row * self.width + col].glyph)
    }

    /// Renders one grid row, colored when `colored` is set.
    pub fn render_row(&self, row: usize, colored: bool) -> String {
        let mut line = String::with_capacity(self.width * 2);
        for cell in &self.cells[row * self.width..(row + 1) * self.width] {
            match (colored, cell.color) {
                (true, Some(color)) => {
                    let styled = style::style(cell.glyph).with(style::Color::from(color));
                    line.push_str(&styled.to_string());
                }
                _ => line.push(cell.glyph),
            }
        }
        line
    }
}

// ---------------------------------------------------------------------------
// Surface guard
// ---------------------------------------------------------------------------

/// Counts live surfaces for one renderer.
#[derive(Debug, Default)]
pub struct SurfaceTracker {
    live: Cell<usize>,
    acquired: Cell<usize>,
}

impl SurfaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, width: usize, height: usize, bounds: ChartBounds) -> Surface<'_> {
        self.live.set(self.live.get() + 1);
        self.acquired.set(self.acquired.get() + 1);
        Surface {
            canvas: Canvas::new(width, height, bounds),
            tracker: self,
        }
    }

    /// Surfaces acquired and not yet dropped.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Surfaces acquired since creation.
    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }
}

/// Scoped canvas; released on drop.
pub struct Surface<'t> {
    canvas: Canvas,
    tracker: &'t SurfaceTracker,
}

impl Deref for Surface<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        &self.canvas
    }
}

impl DerefMut for Surface<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

impl Drop for Surface<'_> {
    fn drop(&mut self) {
        self.tracker.live.set(self.tracker.live.get() - 1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
