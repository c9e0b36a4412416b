//! Row-parallel grid evaluation with or without rayon.
//!
//! With the `parallel` feature this re-exports rayon's prelude. Without it,
//! `into_par_iter()` is a plain `into_iter()`, so grid code is written once
//! and the `map`/`collect` chain resolves to `Iterator` methods.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`
    pub trait IntoParallelIterator {
        type Iter: Iterator<Item = Self::Item>;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_order_preserved() {
        let rows: Vec<usize> = (0..64usize).into_par_iter().map(|r| r * 2).collect();
        assert_eq!(rows.len(), 64);
        assert!(rows.iter().enumerate().all(|(i, &v)| v == i * 2));
    }
}
