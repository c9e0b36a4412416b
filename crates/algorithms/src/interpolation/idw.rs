//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates values at unknown locations as a weighted average of all
//! sample points, where weights are inversely proportional to distance
//! raised to a power parameter.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use serde::{Deserialize, Serialize};
use sparsefield_core::{Error, Estimator, Result};

use crate::tolerance::COINCIDENT;

use super::{check_samples, SamplePoint};

/// Minimum number of samples for IDW
pub const IDW_MIN_SAMPLES: usize = 3;

/// Parameters for IDW interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdwParams {
    /// Power parameter (default: 2.0).
    /// Higher values give more weight to nearby points.
    pub power: f64,
    /// If a sample point is closer than this to the query, its value is
    /// used directly (avoids the singularity at zero distance).
    pub snap_distance: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            snap_distance: COINCIDENT,
        }
    }
}

impl IdwParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(Error::invalid_parameter(
                "power",
                self.power,
                "must be finite and positive",
            ));
        }
        if !self.snap_distance.is_finite() || self.snap_distance < 0.0 {
            return Err(Error::invalid_parameter(
                "snap_distance",
                self.snap_distance,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// IDW estimator over one sample snapshot.
#[derive(Debug, Clone)]
pub struct IdwModel<'a> {
    points: &'a [SamplePoint],
    params: IdwParams,
}

impl<'a> IdwModel<'a> {
    /// Prepare an IDW estimator.
    ///
    /// # Errors
    /// [`Error::InsufficientSamples`] for fewer than three samples,
    /// [`Error::InvalidParameter`] for bad parameters or non-finite samples.
    pub fn new(points: &'a [SamplePoint], params: IdwParams) -> Result<Self> {
        check_samples(points, IDW_MIN_SAMPLES)?;
        params.validate()?;
        Ok(Self { points, params })
    }

    pub fn params(&self) -> &IdwParams {
        &self.params
    }
}

impl Estimator for IdwModel<'_> {
    fn name(&self) -> &'static str {
        "idw"
    }

    /// ```text
    /// z(x,y) = Σ(wi * zi) / Σ(wi)
    /// where wi = 1 / d(x,y, xi,yi)^p
    /// ```
    fn estimate(&self, x: f64, y: f64) -> Result<f64> {
        let snap_sq = self.params.snap_distance * self.params.snap_distance;
        let power = self.params.power;

        let mut sum_w = 0.0;
        let mut sum_wz = 0.0;

        for pt in self.points {
            let dsq = pt.dist_sq(x, y);
            if dsq < snap_sq {
                return Ok(pt.value);
            }

            // d^p computed as (d²)^(p/2)
            let w = 1.0 / dsq.powf(power / 2.0);
            sum_w += w;
            sum_wz += w * pt.value;
        }

        if sum_w == 0.0 || !sum_w.is_finite() {
            return Err(Error::DegenerateWeights);
        }

        Ok(sum_wz / sum_w)
    }
}
