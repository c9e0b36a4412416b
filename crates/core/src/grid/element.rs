//! Grid element trait for generic cell values

use num_traits::{Float, NumCast};
use std::fmt::Debug;

/// Trait for types that can be stored in a grid cell.
///
/// Estimates are floating point; the bound keeps `Grid<T>` usable for
/// both `f64` (engine output) and `f32` (compact copies handed to renderers).
pub trait GridElement: Float + Debug + Send + Sync + 'static {
    /// Widen to f64
    fn as_f64(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// Narrow from f64, saturating to infinity when out of range
    fn from_f64(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(|| {
            if value.is_sign_negative() {
                Self::neg_infinity()
            } else {
                Self::infinity()
            }
        })
    }
}

impl GridElement for f32 {}
impl GridElement for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_f64() {
        assert_eq!(2.5_f32.as_f64(), 2.5);
        assert_eq!((-7.25_f64).as_f64(), -7.25);
    }

    #[test]
    fn test_from_f64_saturates() {
        assert_eq!(<f32 as GridElement>::from_f64(1e300), f32::INFINITY);
        assert_eq!(<f32 as GridElement>::from_f64(-1e300), f32::NEG_INFINITY);
        assert_eq!(<f32 as GridElement>::from_f64(3.0), 3.0_f32);
    }
}
