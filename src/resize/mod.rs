//! Resize operations.
//!
//! Each operation is a pure function from the current grid (plus a caller
//! measurement) to a new grid. The input snapshot is never mutated, so a
//! failed operation leaves the caller's grid exactly as it was.

mod column;
mod edge;
mod row;

pub use column::{resize_column, resize_column_px};
pub use edge::resize_outer_edge;
pub use row::{resize_rows, RowBounds};
