//! Grid data structures and placement

mod element;
mod extent;
mod transform;
mod values;

pub use element::GridElement;
pub use extent::{Extent, GridSpec, Resolution, MAX_CELLS};
pub use transform::GridTransform;
pub use values::{Grid, GridStatistics};
