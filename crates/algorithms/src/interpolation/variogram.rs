//! Variogram models for ordinary kriging
//!
//! The covariance model is derived heuristically from the samples rather
//! than fitted: the sill comes from the sample variance and the range from
//! the largest sample separation.
//!
//! Shape functions m(h), rising from 0 at h = 0 toward 1:
//! ```text
//! gaussian:     m(h) = 1 - exp(-(h/a)²)
//! exponential:  m(h) = 1 - exp(-h/a)
//! spherical:    m(h) = 1.5(h/a) - 0.5(h/a)³   for h < a;   1 beyond
//! ```
//! Covariance: C(0) = psill + nugget, C(h) = psill · (1 - m(h)).
//!
//! Reference:
//! Matheron, G. (1963). Principles of geostatistics. Economic Geology.
//! Cressie, N. (1993). Statistics for Spatial Data. Wiley.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sparsefield_core::{Error, Result};
use tracing::debug;

use crate::tolerance::{DEFAULT_NUGGET, MIN_PARTIAL_SILL, RANGE_FRACTION};

use super::{check_samples, SamplePoint};

/// Minimum number of samples for a variogram
pub const VARIOGRAM_MIN_SAMPLES: usize = 3;

/// Theoretical variogram shape family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariogramFamily {
    #[default]
    Gaussian,
    Exponential,
    Spherical,
}

impl VariogramFamily {
    /// Normalized shape m(h) for separation `h` and range `a`
    pub fn shape(self, h: f64, range: f64) -> f64 {
        let r = h / range;
        match self {
            VariogramFamily::Gaussian => 1.0 - (-(r * r)).exp(),
            VariogramFamily::Exponential => 1.0 - (-r).exp(),
            VariogramFamily::Spherical => {
                if h >= range {
                    1.0
                } else {
                    1.5 * r - 0.5 * r * r * r
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariogramFamily::Gaussian => "gaussian",
            VariogramFamily::Exponential => "exponential",
            VariogramFamily::Spherical => "spherical",
        }
    }
}

impl fmt::Display for VariogramFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariogramFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" => Ok(VariogramFamily::Gaussian),
            "exponential" => Ok(VariogramFamily::Exponential),
            "spherical" => Ok(VariogramFamily::Spherical),
            _ => Err(Error::invalid_parameter(
                "family",
                s,
                "expected gaussian, exponential or spherical",
            )),
        }
    }
}

/// Kriging parameters: how the [`VariogramModel`] is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KrigingParams {
    /// Shape family (default gaussian)
    pub family: VariogramFamily,
    /// Nugget: covariance jump at zero separation (default 1e-6)
    pub nugget: f64,
    /// Explicit range. `None` derives it as 0.7 × the largest sample separation.
    pub range: Option<f64>,
}

impl Default for KrigingParams {
    fn default() -> Self {
        Self {
            family: VariogramFamily::Gaussian,
            nugget: DEFAULT_NUGGET,
            range: None,
        }
    }
}

/// Covariance model derived from one sample snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariogramModel {
    pub family: VariogramFamily,
    /// Nugget (c₀)
    pub nugget: f64,
    /// Range (a)
    pub range: f64,
    /// Sill: nugget + sample variance
    pub sill: f64,
    /// Partial sill: sill - nugget, floored at 1e-12
    pub psill: f64,
}

impl VariogramModel {
    /// Build a model from explicit parameters.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] when the nugget is negative or non-finite,
    /// the range is not positive, or the variance is negative.
    pub fn new(family: VariogramFamily, nugget: f64, range: f64, variance: f64) -> Result<Self> {
        if !nugget.is_finite() || nugget < 0.0 {
            return Err(Error::invalid_parameter(
                "nugget",
                nugget,
                "must be finite and non-negative",
            ));
        }
        if !range.is_finite() || range <= 0.0 {
            return Err(Error::invalid_parameter(
                "range",
                range,
                "must be finite and positive",
            ));
        }
        if !variance.is_finite() || variance < 0.0 {
            return Err(Error::invalid_parameter(
                "variance",
                variance,
                "must be finite and non-negative",
            ));
        }

        let sill = (nugget + variance).max(nugget + MIN_PARTIAL_SILL);
        let psill = (sill - nugget).max(MIN_PARTIAL_SILL);

        Ok(Self {
            family,
            nugget,
            range,
            sill,
            psill,
        })
    }

    /// Derive a model from samples.
    ///
    /// # Errors
    /// - [`Error::InsufficientSamples`] for fewer than three samples
    /// - [`Error::DegenerateVariance`] when every value is identical
    /// - [`Error::InvalidParameter`] for a bad nugget or range
    pub fn from_samples(points: &[SamplePoint], params: &KrigingParams) -> Result<Self> {
        check_samples(points, VARIOGRAM_MIN_SAMPLES)?;

        let first = points[0].value;
        if points.iter().all(|p| p.value == first) {
            return Err(Error::DegenerateVariance);
        }

        let range = match params.range {
            Some(range) => range,
            None => RANGE_FRACTION * max_pairwise_distance(points),
        };
        let variance = sample_variance(points);

        let model = Self::new(params.family, params.nugget, range, variance)?;
        debug!(
            family = %model.family,
            nugget = model.nugget,
            range = model.range,
            sill = model.sill,
            psill = model.psill,
            "derived variogram model"
        );
        Ok(model)
    }

    /// Total variance at zero separation
    #[inline]
    pub fn total_sill(&self) -> f64 {
        self.psill + self.nugget
    }

    /// Semivariance γ(h) = nugget + psill · m(h), with γ(0) = 0
    pub fn semivariance(&self, h: f64) -> f64 {
        if h == 0.0 {
            return 0.0;
        }
        self.nugget + self.psill * self.family.shape(h, self.range)
    }

    /// Covariance C(h)
    pub fn covariance(&self, h: f64) -> f64 {
        if h == 0.0 {
            return self.total_sill();
        }
        self.psill * (1.0 - self.family.shape(h, self.range))
    }
}

/// Largest distance between any two samples; 1 when all coincide
pub fn max_pairwise_distance(points: &[SamplePoint]) -> f64 {
    let mut max_dist = 0.0_f64;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].dist(points[j].x, points[j].y);
            if d > max_dist {
                max_dist = d;
            }
        }
    }
    if max_dist > 0.0 { max_dist } else { 1.0 }
}

/// Sample variance of the values (n - 1 denominator)
pub fn sample_variance(points: &[SamplePoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mu = super::mean_value(points);
    let ss: f64 = points.iter().map(|p| (p.value - mu).powi(2)).sum();
    ss / (points.len() - 1) as f64
}
