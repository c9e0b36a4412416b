//! Piecewise-linear interpolation
//!
//! Two samples define a linear ramp along the segment joining them. Three
//! or more samples are triangulated (Delaunay) and interpolated with
//! barycentric weights inside the hull; outside, the nearest non-collinear
//! triple is extended as a plane (see [`super::extrapolate`]).

use sparsefield_core::{Estimator, Result};
use tracing::debug;

use crate::tolerance::COINCIDENT;

use super::extrapolate::extrapolate;
use super::geometry::Triangulation;
use super::{check_samples, SamplePoint};

/// Minimum number of samples for linear interpolation
pub const LINEAR_MIN_SAMPLES: usize = 2;

/// Linear estimator prepared from one sample snapshot.
#[derive(Debug, Clone)]
pub enum LinearModel<'a> {
    /// Exactly two samples: projection onto the segment `p1 → p2`
    Segment { p1: SamplePoint, p2: SamplePoint },
    /// Three or more samples: Delaunay triangulation plus planar extrapolation
    Tin {
        points: &'a [SamplePoint],
        triangulation: Triangulation,
    },
}

impl<'a> LinearModel<'a> {
    /// Prepare a linear estimator.
    ///
    /// # Errors
    /// [`sparsefield_core::Error::InsufficientSamples`] for fewer than two samples,
    /// [`sparsefield_core::Error::InvalidParameter`] for non-finite samples.
    pub fn new(points: &'a [SamplePoint]) -> Result<Self> {
        check_samples(points, LINEAR_MIN_SAMPLES)?;

        if let [p1, p2] = points {
            return Ok(LinearModel::Segment { p1: *p1, p2: *p2 });
        }

        let triangulation = Triangulation::new(points);
        debug!(
            samples = points.len(),
            triangles = triangulation.len(),
            "built Delaunay triangulation"
        );

        Ok(LinearModel::Tin {
            points,
            triangulation,
        })
    }
}

/// Linear ramp through two samples, evaluated at `(x, y)`.
///
/// `t` is the scalar projection of the query onto `p1 → p2`, so points past
/// either end extrapolate along the ramp. Coincident samples give their mean.
pub fn segment_estimate(p1: &SamplePoint, p2: &SamplePoint, x: f64, y: f64) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < COINCIDENT {
        return (p1.value + p2.value) / 2.0;
    }

    let t = ((x - p1.x) * dx + (y - p1.y) * dy) / length_sq;
    p1.value + t * (p2.value - p1.value)
}

impl Estimator for LinearModel<'_> {
    fn name(&self) -> &'static str {
        match self {
            LinearModel::Segment { .. } => "linear-segment",
            LinearModel::Tin { .. } => "linear-tin",
        }
    }

    fn estimate(&self, x: f64, y: f64) -> Result<f64> {
        match self {
            LinearModel::Segment { p1, p2 } => Ok(segment_estimate(p1, p2, x, y)),
            LinearModel::Tin {
                points,
                triangulation,
            } => match triangulation.interpolate(points, x, y) {
                Some(value) => Ok(value),
                None => extrapolate(points, x, y),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sparsefield_core::Error;

    fn corner_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(0.0, 10.0, 10.0),
            SamplePoint::new(10.0, 10.0, 20.0),
            SamplePoint::new(0.0, 0.0, 30.0),
            SamplePoint::new(10.0, 0.0, 40.0),
        ]
    }

    #[test]
    fn test_segment_interpolation_and_extrapolation() {
        let points = vec![
            SamplePoint::new(0.0, 0.0, 0.0),
            SamplePoint::new(10.0, 0.0, 10.0),
        ];
        let model = LinearModel::new(&points).unwrap();
        assert_eq!(model.name(), "linear-segment");
        assert_relative_eq!(model.estimate(5.0, 0.0).unwrap(), 5.0);
        assert_relative_eq!(model.estimate(20.0, 0.0).unwrap(), 20.0);
        // Off-axis queries project onto the segment
        assert_relative_eq!(model.estimate(5.0, 7.0).unwrap(), 5.0);
        assert_relative_eq!(model.estimate(-5.0, 0.0).unwrap(), -5.0);
    }

    #[test]
    fn test_segment_coincident_samples() {
        let points = vec![
            SamplePoint::new(3.0, 3.0, 4.0),
            SamplePoint::new(3.0, 3.0, 8.0),
        ];
        let model = LinearModel::new(&points).unwrap();
        for &(x, y) in &[(0.0, 0.0), (3.0, 3.0), (-100.0, 42.0)] {
            assert_eq!(model.estimate(x, y).unwrap(), 6.0);
        }
    }

    #[test]
    fn test_tin_plane_is_reproduced() {
        // z = x + y
        let points = vec![
            SamplePoint::new(0.0, 0.0, 0.0),
            SamplePoint::new(10.0, 0.0, 10.0),
            SamplePoint::new(0.0, 10.0, 10.0),
            SamplePoint::new(10.0, 10.0, 20.0),
        ];
        let model = LinearModel::new(&points).unwrap();
        assert_eq!(model.name(), "linear-tin");
        assert_relative_eq!(model.estimate(5.0, 5.0).unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(model.estimate(2.5, 7.0).unwrap(), 9.5, epsilon = 1e-9);
        // Outside the hull the plane keeps going
        assert_relative_eq!(model.estimate(15.0, 12.0).unwrap(), 27.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tin_at_vertices() {
        let points = corner_points();
        let model = LinearModel::new(&points).unwrap();
        for p in &points {
            assert_relative_eq!(model.estimate(p.x, p.y).unwrap(), p.value, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_tin_inside_is_bounded_by_vertices() {
        let points = corner_points();
        let model = LinearModel::new(&points).unwrap();
        for i in 0..=10 {
            for j in 0..=10 {
                let v = model.estimate(i as f64, j as f64).unwrap();
                assert!(
                    (10.0 - 1e-9..=40.0 + 1e-9).contains(&v),
                    "Value {} out of range at ({}, {})",
                    v,
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_collinear_samples_fall_back_to_mean() {
        let points = vec![
            SamplePoint::new(0.0, 0.0, 1.0),
            SamplePoint::new(1.0, 0.0, 2.0),
            SamplePoint::new(2.0, 0.0, 6.0),
        ];
        let model = LinearModel::new(&points).unwrap();
        assert_relative_eq!(model.estimate(1.0, 5.0).unwrap(), 3.0);
    }

    #[test]
    fn test_too_few_points() {
        let points = vec![SamplePoint::new(0.0, 0.0, 1.0)];
        assert_eq!(
            LinearModel::new(&points).unwrap_err(),
            Error::InsufficientSamples {
                required: 2,
                got: 1
            }
        );
    }
}
