//! Dense linear algebra for the small kriging systems
//!
//! Matrices are `ndarray` arrays. Every routine checks shapes and reports
//! [`Error::DimensionMismatch`] instead of panicking.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use sparsefield_core::{Error, Result};

/// Matrix product `A·B`
pub fn multiply(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    if a.ncols() != b.nrows() {
        return Err(Error::DimensionMismatch {
            op: "multiply",
            ar: a.nrows(),
            ac: a.ncols(),
            br: b.nrows(),
            bc: b.ncols(),
        });
    }
    Ok(a.dot(&b))
}

/// Matrix-vector product `A·v`
pub fn mat_vec(a: ArrayView2<'_, f64>, v: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    if a.ncols() != v.len() {
        return Err(Error::DimensionMismatch {
            op: "mat_vec",
            ar: a.nrows(),
            ac: a.ncols(),
            br: v.len(),
            bc: 1,
        });
    }
    Ok(a.dot(&v))
}

/// Owned transpose
pub fn transpose(a: ArrayView2<'_, f64>) -> Array2<f64> {
    a.t().to_owned()
}

/// Dot product over the common prefix of `a` and `b`
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Invert a square matrix by Gauss–Jordan elimination.
///
/// A zero pivot is replaced by swapping in the first row below it with a
/// non-zero entry in that column. Fails with [`Error::SingularMatrix`] when
/// no such row exists.
pub fn invert(a: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::DimensionMismatch {
            op: "invert",
            ar: n,
            ac: a.ncols(),
            br: n,
            bc: n,
        });
    }

    let mut work = a.to_owned();
    let mut inv = Array2::<f64>::eye(n);

    for i in 0..n {
        if work[(i, i)] == 0.0 {
            let swap_row = ((i + 1)..n)
                .find(|&j| work[(j, i)] != 0.0)
                .ok_or(Error::SingularMatrix)?;
            for k in 0..n {
                work.swap((i, k), (swap_row, k));
                inv.swap((i, k), (swap_row, k));
            }
        }

        let pivot = work[(i, i)];
        for k in 0..n {
            work[(i, k)] /= pivot;
            inv[(i, k)] /= pivot;
        }

        for j in 0..n {
            if j == i {
                continue;
            }
            let factor = work[(j, i)];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                work[(j, k)] -= factor * work[(i, k)];
                inv[(j, k)] -= factor * inv[(i, k)];
            }
        }
    }

    if inv.iter().any(|v| !v.is_finite()) {
        return Err(Error::SingularMatrix);
    }

    Ok(inv)
}
