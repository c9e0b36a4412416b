//! Spatial interpolation algorithms
//!
//! Estimate a scalar field from scattered samples:
//! - Linear: Delaunay triangulation with barycentric weights, planar
//!   extrapolation outside the hull
//! - IDW: Inverse Distance Weighting
//! - Variogram: heuristic covariance model
//! - Ordinary Kriging: BLUE with a global augmented system

pub mod extrapolate;
pub mod geometry;
mod idw;
pub mod kriging;
mod linear;
pub mod variogram;

pub use extrapolate::extrapolate;
pub use geometry::{Triangle, Triangulation};
pub use idw::{IdwModel, IdwParams, IDW_MIN_SAMPLES};
pub use kriging::{KrigingModel, KrigingPrediction, KRIGING_MIN_SAMPLES};
pub use linear::{segment_estimate, LinearModel, LINEAR_MIN_SAMPLES};
pub use variogram::{KrigingParams, VariogramFamily, VariogramModel};

use serde::{Deserialize, Serialize};
use sparsefield_core::{Error, Result};

use crate::tolerance::COINCIDENT;

/// A sample point with x, y coordinates and a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to another point
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn dist(&self, other_x: f64, other_y: f64) -> f64 {
        self.dist_sq(other_x, other_y).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.value.is_finite()
    }
}

/// Check the sample count and reject non-finite samples.
pub(crate) fn check_samples(points: &[SamplePoint], required: usize) -> Result<()> {
    if points.len() < required {
        return Err(Error::InsufficientSamples {
            required,
            got: points.len(),
        });
    }
    if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(Error::invalid_parameter(
            "samples",
            format!("#{i} ({}, {}, {})", p.x, p.y, p.value),
            "coordinates and value must be finite",
        ));
    }
    Ok(())
}

/// First sample within [`COINCIDENT`] of `(x, y)`, in sample order
pub fn coincident_sample(points: &[SamplePoint], x: f64, y: f64) -> Option<&SamplePoint> {
    let limit = COINCIDENT * COINCIDENT;
    points.iter().find(|p| p.dist_sq(x, y) < limit)
}

/// Arithmetic mean of the sample values; 0 for an empty slice
pub(crate) fn mean_value(points: &[SamplePoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64
}
