//! Error types for sparsefield

use thiserror::Error;

/// Main error type for sparsefield operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Insufficient samples: {required} required, got {got}")]
    InsufficientSamples { required: usize, got: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Degenerate variance: all sample values are identical")]
    DegenerateVariance,

    #[error("Singular matrix: the kriging system cannot be inverted")]
    SingularMatrix,

    #[error("Degenerate weights: inverse-distance weights sum to zero")]
    DegenerateWeights,

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Dimension mismatch in {op}: ({ar}, {ac}) vs ({br}, {bc})")]
    DimensionMismatch {
        op: &'static str,
        ar: usize,
        ac: usize,
        br: usize,
        bc: usize,
    },

    #[error("Grid evaluation cancelled after {rows_done} rows")]
    Cancelled { rows_done: usize },
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for sparsefield operations
pub type Result<T> = std::result::Result<T, Error>;
