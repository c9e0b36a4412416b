//! Rectangular query domains and grid resolution

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::GridTransform;

/// Axis-aligned rectangular domain in sample coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    /// Create a validated extent. Bounds must be finite with `max > min`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let extent = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        extent.validate()?;
        Ok(extent)
    }

    /// Smallest extent containing every coordinate pair, or `None` when the
    /// iterator is empty. The result may have zero span on either axis.
    pub fn enclosing<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = coords.into_iter();
        let (x, y) = iter.next()?;
        let mut extent = Self {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        };
        for (x, y) in iter {
            extent.x_min = extent.x_min.min(x);
            extent.x_max = extent.x_max.max(x);
            extent.y_min = extent.y_min.min(y);
            extent.y_max = extent.y_max.max(y);
        }
        Some(extent)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Widen any axis with zero span by `half_width` on both sides
    pub fn widen_degenerate(mut self, half_width: f64) -> Self {
        if self.x_min == self.x_max {
            self.x_min -= half_width;
            self.x_max += half_width;
        }
        if self.y_min == self.y_max {
            self.y_min -= half_width;
            self.y_max += half_width;
        }
        self
    }

    /// Grow each side by `factor` times the span of its axis
    pub fn padded(mut self, factor: f64) -> Self {
        let dx = self.width() * factor;
        let dy = self.height() * factor;
        self.x_min -= dx;
        self.x_max += dx;
        self.y_min -= dy;
        self.y_max += dy;
        self
    }

    fn validate(&self) -> Result<()> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid_parameter(
                "extent",
                format!("{:?}", bounds),
                "bounds must be finite",
            ));
        }
        if self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(Error::invalid_parameter(
                "extent",
                format!("{:?}", bounds),
                "maximum must exceed minimum on both axes",
            ));
        }
        Ok(())
    }
}

/// Largest grid whose `f64` values fit in one allocation
pub const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

fn checked_cell_count(cols: usize, rows: usize) -> Result<usize> {
    cols.checked_mul(rows)
        .filter(|&n| n <= MAX_CELLS)
        .ok_or(Error::InvalidDimensions {
            width: cols,
            height: rows,
        })
}

/// How finely an [`Extent`] is divided into cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Exactly `nx` columns by `ny` rows spanning the extent
    Counts { nx: usize, ny: usize },
    /// Square cells of the given size anchored at the minimum corner.
    /// The lattice may overhang the maximum edges by less than one cell.
    CellSize(f64),
}

/// A rendering domain: an extent plus its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSpec {
    extent: Extent,
    cols: usize,
    rows: usize,
    transform: GridTransform,
}

impl GridSpec {
    /// Build a spec from an extent and resolution.
    pub fn new(extent: Extent, resolution: Resolution) -> Result<Self> {
        extent.validate()?;
        match resolution {
            Resolution::Counts { nx, ny } => {
                if nx == 0 || ny == 0 {
                    return Err(Error::InvalidDimensions {
                        width: nx,
                        height: ny,
                    });
                }
                checked_cell_count(nx, ny)?;
                let transform = GridTransform::new(
                    extent.x_min,
                    extent.y_min,
                    extent.width() / nx as f64,
                    extent.height() / ny as f64,
                );
                Ok(Self {
                    extent,
                    cols: nx,
                    rows: ny,
                    transform,
                })
            }
            Resolution::CellSize(cell) => {
                if !cell.is_finite() || cell <= 0.0 {
                    return Err(Error::invalid_parameter(
                        "cell_size",
                        cell,
                        "must be finite and positive",
                    ));
                }
                // Float-to-int casts saturate, so an oversized axis lands on
                // usize::MAX and fails the count check
                let cols = ((extent.width() / cell).ceil() as usize).max(1);
                let rows = ((extent.height() / cell).ceil() as usize).max(1);
                checked_cell_count(cols, rows)?;
                let transform = GridTransform::new(extent.x_min, extent.y_min, cell, cell);
                Ok(Self {
                    extent,
                    cols,
                    rows,
                    transform,
                })
            }
        }
    }

    /// Shorthand for [`Resolution::Counts`]
    pub fn with_counts(extent: Extent, nx: usize, ny: usize) -> Result<Self> {
        Self::new(extent, Resolution::Counts { nx, ny })
    }

    /// Shorthand for [`Resolution::CellSize`]
    pub fn with_cell_size(extent: Extent, cell: f64) -> Result<Self> {
        Self::new(extent, Resolution::CellSize(cell))
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// Number of columns (nx)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows (ny)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells; bounded by [`MAX_CELLS`] at construction
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Center of cell `(col, row)`; row 0 is the minimum-Y edge
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.cell_center(col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extent_rejects_inverted_bounds() {
        assert!(Extent::new(10.0, 0.0, 0.0, 10.0).is_err());
        assert!(Extent::new(0.0, 10.0, 5.0, 5.0).is_err());
        assert!(Extent::new(0.0, f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_enclosing_and_padding() {
        let coords = [(1.0, 2.0), (5.0, -1.0), (3.0, 4.0)];
        let extent = Extent::enclosing(coords).unwrap();
        assert_eq!(extent.x_min, 1.0);
        assert_eq!(extent.x_max, 5.0);
        assert_eq!(extent.y_min, -1.0);
        assert_eq!(extent.y_max, 4.0);

        let padded = extent.padded(0.5);
        assert_relative_eq!(padded.x_min, -1.0);
        assert_relative_eq!(padded.x_max, 7.0);
        assert_relative_eq!(padded.y_min, -3.5);
        assert_relative_eq!(padded.y_max, 6.5);

        assert!(Extent::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn test_widen_degenerate() {
        let extent = Extent::enclosing([(2.0, 3.0), (2.0, 7.0)])
            .unwrap()
            .widen_degenerate(5.0);
        assert_eq!(extent.x_min, -3.0);
        assert_eq!(extent.x_max, 7.0);
        assert_eq!(extent.y_min, 3.0);
        assert_eq!(extent.y_max, 7.0);
    }

    #[test]
    fn test_counts_spec() {
        let extent = Extent::new(0.0, 10.0, 0.0, 5.0).unwrap();
        let spec = GridSpec::with_counts(extent, 10, 5).unwrap();
        assert_eq!(spec.cols(), 10);
        assert_eq!(spec.rows(), 5);
        let (x, y) = spec.cell_center(0, 0);
        assert_relative_eq!(x, 0.5);
        assert_relative_eq!(y, 0.5);
        let (x, y) = spec.cell_center(9, 4);
        assert_relative_eq!(x, 9.5);
        assert_relative_eq!(y, 4.5);
    }

    #[test]
    fn test_cell_size_spec() {
        let extent = Extent::new(0.0, 10.0, 0.0, 4.5).unwrap();
        let spec = GridSpec::with_cell_size(extent, 2.0).unwrap();
        assert_eq!(spec.cols(), 5);
        assert_eq!(spec.rows(), 3);
        assert_eq!(spec.cell_count(), 15);
        assert!(GridSpec::with_cell_size(extent, 0.0).is_err());
    }

    #[test]
    fn test_oversized_cell_size_rejected() {
        let extent = Extent::new(0.0, 1e6, 0.0, 1e6).unwrap();
        assert!(matches!(
            GridSpec::with_cell_size(extent, 1e-5),
            Err(Error::InvalidDimensions { width, height })
                if width >= 100_000_000_000 && height >= 100_000_000_000
        ));

        // Ratio beyond usize saturates and is still rejected
        let err = GridSpec::with_cell_size(extent, 1e-300).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_oversized_counts_rejected() {
        let extent = Extent::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(matches!(
            GridSpec::with_counts(extent, usize::MAX, 2),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            GridSpec::with_counts(extent, MAX_CELLS, 2),
            Err(Error::InvalidDimensions { .. })
        ));
        let spec = GridSpec::with_counts(extent, 1000, 1000).unwrap();
        assert_eq!(spec.cell_count(), 1_000_000);
    }

    #[test]
    fn test_zero_counts_rejected() {
        let extent = Extent::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert_eq!(
            GridSpec::with_counts(extent, 0, 4),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        );
    }
}
