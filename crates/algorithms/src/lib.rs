//! # sparsefield algorithms
//!
//! Scalar-field estimation from scattered samples.
//!
//! ## Estimators
//!
//! - **linear**: Delaunay triangulation with barycentric interpolation inside
//!   the hull and planar extrapolation outside
//! - **idw**: inverse distance weighting
//! - **kriging**: ordinary kriging with a heuristic variogram, with variance
//!
//! [`engine::InterpolationEngine`] selects an estimator by [`engine::Algorithm`]
//! and evaluates it at points or over a [`sparsefield_core::GridSpec`].

pub mod engine;
pub mod interpolation;
pub mod linalg;
pub(crate) mod maybe_rayon;
pub mod tolerance;

pub use engine::{
    estimate, estimate_grid, train_variogram, Algorithm, EngineConfig, GridProgress,
    InterpolationEngine,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{
        estimate, estimate_grid, train_variogram, Algorithm, EngineConfig, GridProgress,
        InterpolationEngine,
    };
    pub use crate::interpolation::{
        IdwParams, KrigingModel, KrigingParams, KrigingPrediction, SamplePoint, VariogramFamily,
        VariogramModel,
    };
    pub use sparsefield_core::prelude::*;
}
