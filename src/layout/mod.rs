//! Conversion between logical grid geometry and display pixels.
//!
//! This module handles:
//! - Scale factors from page size to reference display size
//! - Pixel rectangles for rendering columns, rows, and cells
//! - Binary search hit testing at pixel coordinates

mod display;
mod transform;

pub use display::{DisplayCell, DisplayLayout, DisplayRect, Visibility};
pub use transform::CoordinateTransform;
