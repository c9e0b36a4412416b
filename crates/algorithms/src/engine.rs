//! Interpolation engine
//!
//! Single entry point over the three estimators. Every call takes a
//! read-only sample snapshot, builds the estimator it needs (triangulation,
//! IDW weights or kriging system), evaluates it and drops it.

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sparsefield_core::{Error, Estimator, Grid, GridSpec, Result};
use tracing::debug;

use crate::interpolation::{
    check_samples, coincident_sample, IdwModel, IdwParams, KrigingModel, KrigingParams,
    LinearModel, SamplePoint, VariogramFamily, IDW_MIN_SAMPLES, KRIGING_MIN_SAMPLES,
    LINEAR_MIN_SAMPLES,
};
use crate::maybe_rayon::*;

/// Estimation algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Delaunay barycentric interpolation with planar extrapolation
    Linear,
    /// Inverse distance weighting
    Idw,
    /// Ordinary kriging
    Kriging,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Linear, Algorithm::Idw, Algorithm::Kriging];

    /// Minimum number of samples the algorithm accepts
    pub fn min_samples(self) -> usize {
        match self {
            Algorithm::Linear => LINEAR_MIN_SAMPLES,
            Algorithm::Idw => IDW_MIN_SAMPLES,
            Algorithm::Kriging => KRIGING_MIN_SAMPLES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Linear => "linear",
            Algorithm::Idw => "idw",
            Algorithm::Kriging => "kriging",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Algorithm::Linear),
            "idw" => Ok(Algorithm::Idw),
            "kriging" => Ok(Algorithm::Kriging),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub idw: IdwParams,
    pub kriging: KrigingParams,
    /// Rows evaluated between progress checkpoints (default 16)
    pub row_batch: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idw: IdwParams::default(),
            kriging: KrigingParams::default(),
            row_batch: 16,
        }
    }
}

/// Progress reported at grid checkpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridProgress {
    pub rows_done: usize,
    pub rows_total: usize,
}

impl GridProgress {
    /// Fraction of rows evaluated, in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.rows_total == 0 {
            1.0
        } else {
            self.rows_done as f64 / self.rows_total as f64
        }
    }
}

/// Estimator prepared for one call
type Prepared<'a> = Box<dyn Estimator + Send + Sync + 'a>;

/// Facade over the linear, IDW and kriging estimators.
#[derive(Debug, Clone, Default)]
pub struct InterpolationEngine {
    config: EngineConfig,
}

impl InterpolationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the samples and build the estimator for `algorithm`.
    fn prepare<'a>(&self, points: &'a [SamplePoint], algorithm: Algorithm) -> Result<Prepared<'a>> {
        check_samples(points, algorithm.min_samples())?;

        let estimator: Prepared<'a> = match algorithm {
            Algorithm::Linear => Box::new(LinearModel::new(points)?),
            Algorithm::Idw => Box::new(IdwModel::new(points, self.config.idw)?),
            Algorithm::Kriging => Box::new(KrigingModel::train(points, &self.config.kriging)?),
        };
        debug!(
            algorithm = %algorithm,
            estimator = estimator.name(),
            samples = points.len(),
            "prepared estimator"
        );
        Ok(estimator)
    }

    /// Estimate the field at `(x, y)`.
    ///
    /// # Errors
    /// - [`Error::InsufficientSamples`] below the algorithm minimum
    /// - [`Error::InvalidParameter`] for non-finite samples or queries
    /// - [`Error::DegenerateVariance`], [`Error::SingularMatrix`] (kriging)
    /// - [`Error::DegenerateWeights`] (IDW)
    pub fn estimate(
        &self,
        points: &[SamplePoint],
        algorithm: Algorithm,
        x: f64,
        y: f64,
    ) -> Result<f64> {
        check_query(x, y)?;
        let estimator = self.prepare(points, algorithm)?;
        evaluate(points, estimator.as_ref(), x, y)
    }

    /// Estimate at every cell center of `spec`.
    ///
    /// Row 0 of the result is the minimum-Y edge. With the `parallel`
    /// feature rows are evaluated concurrently; values are identical either
    /// way.
    pub fn estimate_grid(
        &self,
        points: &[SamplePoint],
        algorithm: Algorithm,
        spec: &GridSpec,
    ) -> Result<Grid<f64>> {
        let estimator = self.prepare(points, algorithm)?;
        let estimator = estimator.as_ref();
        debug!(rows = spec.rows(), cols = spec.cols(), "evaluating grid");

        let rows = (0..spec.rows())
            .into_par_iter()
            .map(|row| evaluate_row(points, estimator, spec, row))
            .collect::<Result<Vec<Vec<f64>>>>()?;

        Grid::from_spec(spec, rows.into_iter().flatten().collect())
    }

    /// Like [`estimate_grid`](Self::estimate_grid), sequential, calling
    /// `checkpoint` after every `row_batch` rows.
    ///
    /// Returning [`ControlFlow::Break`] abandons the grid with
    /// [`Error::Cancelled`].
    pub fn estimate_grid_with<F>(
        &self,
        points: &[SamplePoint],
        algorithm: Algorithm,
        spec: &GridSpec,
        mut checkpoint: F,
    ) -> Result<Grid<f64>>
    where
        F: FnMut(GridProgress) -> ControlFlow<()>,
    {
        let estimator = self.prepare(points, algorithm)?;
        let estimator = estimator.as_ref();
        let rows_total = spec.rows();
        let batch = self.config.row_batch.max(1);
        debug!(rows = rows_total, cols = spec.cols(), batch, "evaluating grid");

        let mut data = Vec::with_capacity(spec.cell_count());
        let mut row = 0;
        while row < rows_total {
            let end = (row + batch).min(rows_total);
            for r in row..end {
                data.extend(evaluate_row(points, estimator, spec, r)?);
            }
            row = end;

            let progress = GridProgress {
                rows_done: row,
                rows_total,
            };
            if checkpoint(progress).is_break() {
                debug!(rows_done = row, "grid evaluation cancelled");
                return Err(Error::Cancelled { rows_done: row });
            }
        }

        Grid::from_spec(spec, data)
    }

    /// Train a kriging model with the configured variogram parameters.
    pub fn train_variogram(&self, points: &[SamplePoint]) -> Result<KrigingModel> {
        KrigingModel::train(points, &self.config.kriging)
    }
}

fn check_query(x: f64, y: f64) -> Result<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(Error::invalid_parameter(
            "query",
            format!("({x}, {y})"),
            "coordinates must be finite",
        ));
    }
    Ok(())
}

/// A query on top of a sample takes the sample's value.
fn evaluate(
    points: &[SamplePoint],
    estimator: &(dyn Estimator + Send + Sync),
    x: f64,
    y: f64,
) -> Result<f64> {
    match coincident_sample(points, x, y) {
        Some(sample) => Ok(sample.value),
        None => estimator.estimate(x, y),
    }
}

fn evaluate_row(
    points: &[SamplePoint],
    estimator: &(dyn Estimator + Send + Sync),
    spec: &GridSpec,
    row: usize,
) -> Result<Vec<f64>> {
    (0..spec.cols())
        .map(|col| {
            let (x, y) = spec.cell_center(col, row);
            evaluate(points, estimator, x, y)
        })
        .collect()
}

/// [`InterpolationEngine::estimate`] with the default configuration
pub fn estimate(points: &[SamplePoint], algorithm: Algorithm, x: f64, y: f64) -> Result<f64> {
    InterpolationEngine::default().estimate(points, algorithm, x, y)
}

/// [`InterpolationEngine::estimate_grid`] with the default configuration
pub fn estimate_grid(
    points: &[SamplePoint],
    algorithm: Algorithm,
    spec: &GridSpec,
) -> Result<Grid<f64>> {
    InterpolationEngine::default().estimate_grid(points, algorithm, spec)
}

/// Train an ordinary kriging model. `range: None` derives the range from the
/// sample spread.
pub fn train_variogram(
    points: &[SamplePoint],
    family: VariogramFamily,
    nugget: f64,
    range: Option<f64>,
) -> Result<KrigingModel> {
    KrigingModel::train_with(points, family, nugget, range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sparsefield_core::Extent;

    fn corner_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(0.0, 10.0, 10.0),
            SamplePoint::new(10.0, 10.0, 20.0),
            SamplePoint::new(0.0, 0.0, 30.0),
            SamplePoint::new(10.0, 0.0, 40.0),
        ]
    }

    fn spec(nx: usize, ny: usize) -> GridSpec {
        GridSpec::with_counts(Extent::new(-2.0, 12.0, -2.0, 12.0).unwrap(), nx, ny).unwrap()
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("linear".parse::<Algorithm>().unwrap(), Algorithm::Linear);
        assert_eq!("IDW".parse::<Algorithm>().unwrap(), Algorithm::Idw);
        assert_eq!("Kriging".parse::<Algorithm>().unwrap(), Algorithm::Kriging);
        assert_eq!(
            "spline".parse::<Algorithm>().unwrap_err(),
            Error::UnknownAlgorithm("spline".into())
        );
        for a in Algorithm::ALL {
            assert_eq!(a.to_string().parse::<Algorithm>().unwrap(), a);
        }
    }

    #[test]
    fn test_min_samples() {
        let points = vec![SamplePoint::new(0.0, 0.0, 1.0)];
        let engine = InterpolationEngine::default();
        for a in Algorithm::ALL {
            assert_eq!(
                engine.estimate(&points, a, 1.0, 1.0).unwrap_err(),
                Error::InsufficientSamples {
                    required: a.min_samples(),
                    got: 1
                }
            );
        }
    }

    #[test]
    fn test_exact_match_shortcut() {
        let points = corner_points();
        for a in Algorithm::ALL {
            for p in &points {
                assert_eq!(estimate(&points, a, p.x, p.y).unwrap(), p.value);
            }
        }
    }

    #[test]
    fn test_non_finite_query() {
        let points = corner_points();
        assert!(matches!(
            estimate(&points, Algorithm::Idw, f64::NAN, 0.0),
            Err(Error::InvalidParameter { name: "query", .. })
        ));
    }

    #[test]
    fn test_grid_shape_and_cells() {
        let points = corner_points();
        let spec = spec(7, 3);
        for a in Algorithm::ALL {
            let grid = estimate_grid(&points, a, &spec).unwrap();
            assert_eq!(grid.shape(), (3, 7));
            let (x, y) = spec.cell_center(4, 2);
            assert_eq!(grid.get(2, 4).unwrap(), estimate(&points, a, x, y).unwrap());
        }
    }

    #[test]
    fn test_grid_with_checkpoint_matches() {
        let points = corner_points();
        let spec = spec(5, 9);
        let engine = InterpolationEngine::new(EngineConfig {
            row_batch: 2,
            ..Default::default()
        });

        let mut seen = Vec::new();
        let grid = engine
            .estimate_grid_with(&points, Algorithm::Linear, &spec, |p| {
                seen.push(p.rows_done);
                ControlFlow::Continue(())
            })
            .unwrap();

        assert_eq!(seen, vec![2, 4, 6, 8, 9]);
        let plain = engine.estimate_grid(&points, Algorithm::Linear, &spec).unwrap();
        assert_eq!(grid.data(), plain.data());
    }

    #[test]
    fn test_grid_cancel() {
        let points = corner_points();
        let engine = InterpolationEngine::new(EngineConfig {
            row_batch: 3,
            ..Default::default()
        });
        let err = engine
            .estimate_grid_with(&points, Algorithm::Idw, &spec(4, 10), |p| {
                if p.rows_done >= 6 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap_err();
        assert_eq!(err, Error::Cancelled { rows_done: 6 });
    }

    #[test]
    fn test_configured_idw_power() {
        let points = corner_points();
        let engine = InterpolationEngine::new(EngineConfig {
            idw: IdwParams {
                power: 1.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let default = estimate(&points, Algorithm::Idw, 2.0, 8.0).unwrap();
        let low = engine.estimate(&points, Algorithm::Idw, 2.0, 8.0).unwrap();
        assert!((low - 10.0).abs() > (default - 10.0).abs());
    }

    #[test]
    fn test_train_variogram() {
        let points = corner_points();
        let model = train_variogram(&points, VariogramFamily::Exponential, 0.0, Some(5.0)).unwrap();
        assert_eq!(model.variogram().family, VariogramFamily::Exponential);
        assert_eq!(model.variogram().range, 5.0);
        let pred = model.predict_with_variance(5.0, 5.0).unwrap();
        assert!(pred.variance >= 0.0);
        assert_relative_eq!(model.predict(5.0, 5.0).unwrap(), pred.value);
    }

    #[test]
    fn test_progress_fraction() {
        let p = GridProgress {
            rows_done: 3,
            rows_total: 12,
        };
        assert_relative_eq!(p.fraction(), 0.25);
        let empty = GridProgress {
            rows_done: 0,
            rows_total: 0,
        };
        assert_eq!(empty.fraction(), 1.0);
    }
}
