//! Terminal measurements for the layout engine
//!
//! The engine works in logical units; a terminal cell is `cell_width` units
//! wide and `cell_height` units tall.

use mosaic_core::layout::{TileRect, ViewportObserver, ViewportSample};
use ratatui::layout::Rect;

use crate::animation::timing::to_cells;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalViewport {
    /// Full terminal width in cells
    pub terminal_width: u16,
    /// Width of the gallery area in cells
    pub gallery_width: u16,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl TerminalViewport {
    pub fn new(terminal_width: u16, gallery_width: u16, cell_width: f64, cell_height: f64) -> Self {
        Self {
            terminal_width,
            gallery_width,
            cell_width,
            cell_height,
        }
    }

    pub fn units_x(&self, cells: u16) -> f64 {
        cells as f64 * self.cell_width
    }

    pub fn units_y(&self, cells: u16) -> f64 {
        cells as f64 * self.cell_height
    }

    /// Project a tile rectangle onto the gallery area, scrolled by `scroll` rows
    ///
    /// Returns `None` when the tile is entirely outside the visible rows.
    pub fn project(&self, rect: &TileRect, area: Rect, scroll: u16) -> Option<Rect> {
        let x = to_cells(rect.x, self.cell_width);
        let right = to_cells(rect.right(), self.cell_width);
        let top = to_cells(rect.y, self.cell_height) as i32 - scroll as i32;
        let bottom = to_cells(rect.bottom(), self.cell_height) as i32 - scroll as i32;

        if bottom <= 0 || top >= area.height as i32 || right <= x {
            return None;
        }

        let top = top.max(0) as u16;
        let bottom = (bottom as u16).min(area.height);
        let right = right.min(area.width);
        if bottom <= top || right <= x {
            return None;
        }

        Some(Rect::new(area.x + x, area.y + top, right - x, bottom - top))
    }

    /// Logical coordinates of a terminal cell inside the gallery area
    pub fn cell_to_units(&self, column: u16, row: u16, area: Rect, scroll: u16) -> Option<(f64, f64)> {
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        let x = self.units_x(column - area.x) + self.cell_width / 2.0;
        let y = self.units_y(row - area.y + scroll) + self.cell_height / 2.0;
        Some((x, y))
    }
}

impl ViewportObserver for TerminalViewport {
    fn measure(&self) -> ViewportSample {
        ViewportSample::new(self.units_x(self.terminal_width), self.units_x(self.gallery_width))
    }
}
