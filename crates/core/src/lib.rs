//! # sparsefield core
//!
//! Core types and traits for the sparsefield estimation engine.
//!
//! This crate provides:
//! - `Grid<T>`: 2D grid of estimates placed in sample coordinates
//! - `Extent` / `GridSpec`: rectangular query domains and their resolution
//! - `Error`: the error taxonomy shared by every estimator
//! - `Estimator`: the trait every trained estimator implements

pub mod error;
pub mod grid;

pub use error::{Error, Result};
pub use grid::{Extent, Grid, GridElement, GridSpec, GridStatistics, GridTransform, Resolution};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Extent, Grid, GridElement, GridSpec, GridTransform, Resolution};
    pub use crate::Estimator;
}

/// A scalar field estimator prepared from one sample snapshot.
///
/// Implementations are built once per engine call (triangulation, kriging
/// inverse, ...) and then queried at arbitrary points. They hold no state
/// that changes between queries, so evaluation order never affects results.
pub trait Estimator {
    /// Returns the estimator name
    fn name(&self) -> &'static str;

    /// Estimate the field at `(x, y)`
    fn estimate(&self, x: f64, y: f64) -> Result<f64>;

    /// Estimate every cell center of `spec`, row 0 at the minimum-Y edge
    fn estimate_grid(&self, spec: &GridSpec) -> Result<Grid<f64>> {
        let mut data = Vec::with_capacity(spec.cell_count());
        for row in 0..spec.rows() {
            for col in 0..spec.cols() {
                let (x, y) = spec.cell_center(col, row);
                data.push(self.estimate(x, y)?);
            }
        }
        Grid::from_spec(spec, data)
    }
}
