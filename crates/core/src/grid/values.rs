//! Main Grid type

use crate::error::{Error, Result};
use crate::grid::{GridElement, GridSpec, GridTransform};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// A 2D grid of estimates placed in sample coordinates.
///
/// `Grid<T>` stores values in row-major order `(row, col)`. Row 0 is the
/// minimum-Y edge of the domain (see [`GridTransform`]).
///
/// # Example
///
/// ```ignore
/// use sparsefield_core::Grid;
///
/// let mut grid: Grid<f64> = Grid::new(100, 100);
/// grid.set(10, 20, 42.0)?;
/// let value = grid.get(10, 20)?;
/// ```
#[derive(Debug, Clone)]
pub struct Grid<T: GridElement> {
    /// Cell values, indexed (row, col)
    data: Array2<T>,
    /// Placement of cell centers
    transform: GridTransform,
}

impl<T: GridElement> Grid<T> {
    /// Create a new grid filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            transform: GridTransform::default(),
        }
    }

    /// Create a grid from row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            Error::InvalidDimensions {
                width: cols,
                height: rows,
            }
        })?;

        Ok(Self {
            data: array,
            transform: GridTransform::default(),
        })
    }

    /// Create a grid laid out by a [`GridSpec`] from row-major data
    pub fn from_spec(spec: &GridSpec, data: Vec<T>) -> Result<Self> {
        let mut grid = Self::from_vec(data, spec.rows(), spec.cols())?;
        grid.set_transform(*spec.transform());
        Ok(grid)
    }

    /// Convert cell values to another element type, keeping placement
    pub fn cast<U: GridElement>(&self) -> Grid<U> {
        Grid {
            data: self.data.mapv(|v| U::from_f64(v.as_f64())),
            transform: self.transform,
        }
    }

    // Dimensions

    /// Number of rows (ny)
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns (nx)
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a row slice; row 0 is the minimum-Y edge
    pub fn row(&self, row: usize) -> Result<ArrayView1<'_, T>> {
        if row >= self.rows() {
            return Err(Error::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.data.row(row))
    }

    /// Rows as nested vectors, bottom row first
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    // Placement

    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GridTransform) {
        self.transform = transform;
    }

    /// Coordinates of the center of cell (col, row)
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.cell_center(col, row)
    }

    /// Covered bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    // Statistics

    /// Min, max and mean of the finite cells
    pub fn statistics(&self) -> GridStatistics {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.data.iter() {
            let v = value.as_f64();
            if !v.is_finite() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return GridStatistics {
                min: None,
                max: None,
                mean: None,
                finite_count: 0,
            };
        }

        GridStatistics {
            min: Some(min),
            max: Some(max),
            mean: Some(sum / count as f64),
            finite_count: count,
        }
    }
}

/// Basic statistics for a grid, used by renderers to scale color ramps
#[derive(Debug, Clone, PartialEq)]
pub struct GridStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub finite_count: usize,
}
