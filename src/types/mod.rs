//! Data types for the table grid.

mod geometry;
mod grid;

pub use geometry::*;
pub use grid::*;
