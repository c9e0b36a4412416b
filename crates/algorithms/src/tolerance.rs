//! Named numeric tolerances shared by the estimators.
//!
//! These are tunable; changing them shifts results only for
//! near-degenerate inputs.

/// Two positions closer than this are the same location. Also bounds the
/// squared separation of a two-sample segment below which it is treated as
/// a single point.
pub const COINCIDENT: f64 = 1e-9;

/// Determinant magnitude below which a triple is collinear (orientation,
/// circumcircle, barycentric and plane solves).
pub const DEGENERATE_AREA: f64 = 1e-12;

/// Relative slack on the squared circumradius in the in-circle test.
pub const CIRCUMCIRCLE_SLACK: f64 = 1e-12;

/// Barycentric weights at or above this count as inside a triangle.
pub const BARYCENTRIC_INSIDE: f64 = -1e-9;

/// Floor for the partial sill.
pub const MIN_PARTIAL_SILL: f64 = 1e-12;

/// Fraction of the total sill added to the covariance diagonal.
pub const DIAGONAL_JITTER: f64 = 1e-10;

/// Default kriging nugget: near-exact at samples, still invertible.
pub const DEFAULT_NUGGET: f64 = 1e-6;

/// Default variogram range as a fraction of the largest sample separation.
pub const RANGE_FRACTION: f64 = 0.7;
