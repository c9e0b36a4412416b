//! Affine placement of a grid in sample coordinates

use serde::{Deserialize, Serialize};

/// Axis-aligned transformation between grid indices and sample coordinates.
///
/// ```text
/// x = origin_x + (col + 0.5) * cell_width
/// y = origin_y + (row + 0.5) * cell_height
/// ```
///
/// The origin is the minimum-X / minimum-Y corner and `cell_height` is
/// positive, so row 0 lies along the bottom (minimum-Y) edge. Renderers that
/// draw top-down must flip rows themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    /// X coordinate of the minimum corner
    pub origin_x: f64,
    /// Y coordinate of the minimum corner
    pub origin_y: f64,
    /// Cell size in X direction
    pub cell_width: f64,
    /// Cell size in Y direction
    pub cell_height: f64,
}

impl GridTransform {
    pub fn new(origin_x: f64, origin_y: f64, cell_width: f64, cell_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_width,
            cell_height,
        }
    }

    /// Convert grid indices to sample coordinates
    ///
    /// Returns the coordinates of the cell center
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + (col as f64 + 0.5) * self.cell_width;
        let y = self.origin_y + (row as f64 + 0.5) * self.cell_height;
        (x, y)
    }

    /// Convert grid indices to the coordinates of the cell's minimum corner
    pub fn cell_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + col as f64 * self.cell_width;
        let y = self.origin_y + row as f64 * self.cell_height;
        (x, y)
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` covered by `cols × rows` cells
    pub fn bounds(&self, cols: usize, rows: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.cell_corner(0, 0);
        let (x1, y1) = self.cell_corner(cols, rows);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}
