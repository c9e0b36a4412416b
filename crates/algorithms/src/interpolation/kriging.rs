//! Ordinary Kriging interpolation
//!
//! Best Linear Unbiased Estimator (BLUE) for spatial data. Uses a
//! covariance model to compute interpolation weights that minimize
//! estimation variance while satisfying an unbiasedness constraint.
//!
//! The kriging system for n sample points, in covariance form:
//! ```text
//! [C(x₁,x₁) ... C(x₁,xₙ) 1] [w₁]   [C(x₁,x₀)]
//! [   ...     ...    ...    .]  [. ] = [   ...    ]
//! [C(xₙ,x₁) ... C(xₙ,xₙ) 1] [wₙ]   [C(xₙ,x₀)]
//! [  1       ...    1       0] [λ ]   [    1     ]
//! ```
//! where x₀ is the target location and λ the Lagrange multiplier ensuring
//! Σwᵢ = 1. Every sample takes part in every prediction, so the system is
//! inverted once per model and each query is a matrix-vector product.
//!
//! Reference:
//! Matheron, G. (1963). Principles of geostatistics. Economic Geology.
//! Cressie, N. (1993). Statistics for Spatial Data. Wiley.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use sparsefield_core::{Estimator, GridSpec, Result};
use tracing::debug;

use crate::linalg;
use crate::tolerance::DIAGONAL_JITTER;

use super::variogram::{KrigingParams, VariogramFamily, VariogramModel, VARIOGRAM_MIN_SAMPLES};
use super::SamplePoint;

/// Minimum number of samples for kriging
pub const KRIGING_MIN_SAMPLES: usize = VARIOGRAM_MIN_SAMPLES;

/// Kriging estimate with its estimation variance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KrigingPrediction {
    pub value: f64,
    /// Kriging variance, floored at zero
    pub variance: f64,
}

/// A trained ordinary kriging model.
///
/// Owns a copy of the samples, the variogram and the inverse of the
/// augmented covariance system.
#[derive(Debug, Clone)]
pub struct KrigingModel {
    points: Vec<SamplePoint>,
    variogram: VariogramModel,
    inverse: Array2<f64>,
}

impl KrigingModel {
    /// Derive the variogram from `points` and invert the kriging system.
    ///
    /// # Errors
    /// - [`sparsefield_core::Error::InsufficientSamples`] for fewer than three samples
    /// - [`sparsefield_core::Error::DegenerateVariance`] when every value is identical
    /// - [`sparsefield_core::Error::InvalidParameter`] for a bad nugget or range
    /// - [`sparsefield_core::Error::SingularMatrix`] when the system cannot be inverted
    pub fn train(points: &[SamplePoint], params: &KrigingParams) -> Result<Self> {
        let variogram = VariogramModel::from_samples(points, params)?;
        Self::with_variogram(points, variogram)
    }

    /// Convenience wrapper taking the variogram parameters separately.
    pub fn train_with(
        points: &[SamplePoint],
        family: VariogramFamily,
        nugget: f64,
        range: Option<f64>,
    ) -> Result<Self> {
        Self::train(
            points,
            &KrigingParams {
                family,
                nugget,
                range,
            },
        )
    }

    /// Build the kriging system for an already derived variogram.
    pub fn with_variogram(points: &[SamplePoint], variogram: VariogramModel) -> Result<Self> {
        super::check_samples(points, KRIGING_MIN_SAMPLES)?;

        let system = augmented_system(points, &variogram);
        let inverse = linalg::invert(system.view())?;

        debug!(
            samples = points.len(),
            family = %variogram.family,
            "inverted kriging system"
        );

        Ok(Self {
            points: points.to_vec(),
            variogram,
            inverse,
        })
    }

    pub fn variogram(&self) -> &VariogramModel {
        &self.variogram
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Right-hand side `[C(dist(q, i))…, 1]`
    fn rhs(&self, x: f64, y: f64) -> Array1<f64> {
        let n = self.points.len();
        let mut rhs = Array1::<f64>::zeros(n + 1);
        for (i, pt) in self.points.iter().enumerate() {
            rhs[i] = self.variogram.covariance(pt.dist(x, y));
        }
        rhs[n] = 1.0;
        rhs
    }

    /// Solve for the weights and Lagrange multiplier at `(x, y)`
    fn solve(&self, x: f64, y: f64) -> Result<(Array1<f64>, Array1<f64>)> {
        let rhs = self.rhs(x, y);
        let solution = linalg::mat_vec(self.inverse.view(), rhs.view())?;
        Ok((rhs, solution))
    }

    /// Kriging estimate at `(x, y)`
    pub fn predict(&self, x: f64, y: f64) -> Result<f64> {
        let (_, solution) = self.solve(x, y)?;
        Ok(self.weighted_sum(&solution))
    }

    /// Kriging estimate and variance at `(x, y)`.
    ///
    /// ```text
    /// σ² = C(0) - Σ wᵢ·C(xᵢ,x₀) - λ
    /// ```
    pub fn predict_with_variance(&self, x: f64, y: f64) -> Result<KrigingPrediction> {
        let (rhs, solution) = self.solve(x, y)?;
        let value = self.weighted_sum(&solution);
        // Σ wᵢ·C(xᵢ,x₀) + λ·1
        let explained = solution.dot(&rhs);
        let variance = self.variogram.total_sill() - explained;

        Ok(KrigingPrediction {
            value,
            variance: variance.max(0.0),
        })
    }

    fn weighted_sum(&self, solution: &Array1<f64>) -> f64 {
        self.points
            .iter()
            .zip(solution.iter())
            .map(|(pt, w)| w * pt.value)
            .sum()
    }

    /// Predict at every cell center of `spec`
    pub fn grid(&self, spec: &GridSpec) -> Result<sparsefield_core::Grid<f64>> {
        self.estimate_grid(spec)
    }
}

impl Estimator for KrigingModel {
    fn name(&self) -> &'static str {
        "kriging"
    }

    fn estimate(&self, x: f64, y: f64) -> Result<f64> {
        self.predict(x, y)
    }
}

/// `(n+1)×(n+1)` system: covariances, unbiasedness row and column, zero corner
fn augmented_system(points: &[SamplePoint], variogram: &VariogramModel) -> Array2<f64> {
    let n = points.len();
    let jitter = variogram.total_sill() * DIAGONAL_JITTER;
    let mut system = Array2::<f64>::zeros((n + 1, n + 1));

    for i in 0..n {
        for j in 0..n {
            let h = points[i].dist(points[j].x, points[j].y);
            system[(i, j)] = variogram.covariance(h);
        }
        system[(i, i)] += jitter;
        system[(i, n)] = 1.0;
        system[(n, i)] = 1.0;
    }

    system
}
