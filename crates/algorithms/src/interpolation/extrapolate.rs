//! Planar extrapolation outside the triangulated hull
//!
//! A query outside every triangle takes its value from the plane through
//! the nearest non-collinear triple of samples. Proximity wins over
//! conditioning: the first valid triple in distance order is used even if a
//! slightly farther one would be better shaped.

use sparsefield_core::{Error, Result};

use super::geometry::{fit_plane, is_collinear, Plane};
use super::SamplePoint;

/// Sample indices ordered by squared distance to `(x, y)`, ties by index
pub fn rank_by_distance(points: &[SamplePoint], x: f64, y: f64) -> Vec<usize> {
    let dist: Vec<f64> = points.iter().map(|p| p.dist_sq(x, y)).collect();
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| dist[a].total_cmp(&dist[b]).then(a.cmp(&b)));
    order
}

/// Plane through the nearest non-collinear triple, with the triple's indices
/// in ranking order. `None` when every triple is collinear.
pub fn nearest_plane(points: &[SamplePoint], x: f64, y: f64) -> Option<(Plane, [usize; 3])> {
    let order = rank_by_distance(points, x, y);
    let n = order.len();

    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                let (i, j, k) = (order[a], order[b], order[c]);
                let (p, q, r) = (&points[i], &points[j], &points[k]);
                if is_collinear(p, q, r) {
                    continue;
                }
                if let Some(plane) = fit_plane(p, q, r) {
                    return Some((plane, [i, j, k]));
                }
            }
        }
    }

    None
}

/// Extrapolate the field at `(x, y)`.
///
/// Evaluates [`nearest_plane`] at the query; when all samples are collinear
/// the arithmetic mean of the sample values is returned. The value is not
/// clamped to the sample range.
pub fn extrapolate(points: &[SamplePoint], x: f64, y: f64) -> Result<f64> {
    if points.is_empty() {
        return Err(Error::InsufficientSamples {
            required: 1,
            got: 0,
        });
    }

    match nearest_plane(points, x, y) {
        Some((plane, _)) => Ok(plane.evaluate(x, y)),
        None => Ok(super::mean_value(points)),
    }
}
