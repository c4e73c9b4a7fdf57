//! Logical ↔ display coordinate transform.
//!
//! Scales are independent per axis. No rounding happens here: snapping to
//! device pixels is up to the renderer, so repeated resizes never accumulate
//! rounding error.

use serde::Serialize;

use crate::config::DisplaySize;
use crate::error::{GridError, Result};
use crate::types::{Axis, Page, Rect};

/// Per-page scale factors from logical units to display pixels.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateTransform {
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateTransform {
    /// Compute scales for `page` shown at `display` size.
    ///
    /// # Errors
    /// Returns [`GridError::DegeneratePage`] for a zero, negative, or
    /// non-finite page size and [`GridError::DegenerateDisplay`] for an
    /// unusable display size.
    pub fn new(display: DisplaySize, page: Page) -> Result<Self> {
        if !is_positive(page.width) || !is_positive(page.height) {
            return Err(GridError::DegeneratePage {
                width: page.width,
                height: page.height,
            });
        }
        if !is_positive(display.width) || !is_positive(display.height) {
            return Err(GridError::DegenerateDisplay {
                width: display.width,
                height: display.height,
            });
        }
        Ok(Self {
            scale_x: display.width / page.width,
            scale_y: display.height / page.height,
        })
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn scale(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.scale_x,
            Axis::Y => self.scale_y,
        }
    }

    /// Logical value to display pixels.
    pub fn to_display(&self, logical: f64, axis: Axis) -> f64 {
        logical * self.scale(axis)
    }

    /// Display pixels to logical value.
    pub fn to_logical(&self, pixels: f64, axis: Axis) -> f64 {
        pixels / self.scale(axis)
    }

    /// Logical rectangle to display pixels.
    pub fn rect_to_display(&self, rect: Rect) -> Rect {
        Rect::new(
            self.to_display(rect.left, Axis::X),
            self.to_display(rect.top, Axis::Y),
            self.to_display(rect.right, Axis::X),
            self.to_display(rect.bottom, Axis::Y),
        )
    }

    /// Display rectangle to logical units.
    pub fn rect_to_logical(&self, rect: Rect) -> Rect {
        Rect::new(
            self.to_logical(rect.left, Axis::X),
            self.to_logical(rect.top, Axis::Y),
            self.to_logical(rect.right, Axis::X),
            self.to_logical(rect.bottom, Axis::Y),
        )
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn letter() -> Page {
        Page {
            width: 850.0,
            height: 1100.0,
        }
    }

    #[test]
    fn test_reference_scales() {
        let t = CoordinateTransform::new(DisplaySize::default(), letter()).unwrap();
        assert!((t.scale_x() - 1.294_117).abs() < 1e-5);
        assert!((t.scale_y() - 0.727_272).abs() < 1e-5);
    }

    #[test]
    fn test_column_to_display() {
        let t = CoordinateTransform::new(DisplaySize::default(), letter()).unwrap();
        assert!((t.to_display(100.0, Axis::X) - 129.41).abs() < 0.01);
        assert!((t.to_display(200.0, Axis::X) - 258.82).abs() < 0.01);
    }

    #[test]
    fn test_zero_page_rejected() {
        let err = CoordinateTransform::new(
            DisplaySize::default(),
            Page {
                width: 0.0,
                height: 1100.0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, GridError::DegeneratePage { .. }));

        let err = CoordinateTransform::new(
            DisplaySize::default(),
            Page {
                width: 850.0,
                height: 0.0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, GridError::DegeneratePage { .. }));
    }

    #[test]
    fn test_zero_display_rejected() {
        let display = DisplaySize {
            width: 0.0,
            height: 800.0,
        };
        let err = CoordinateTransform::new(display, letter()).unwrap_err();
        assert!(matches!(err, GridError::DegenerateDisplay { .. }));
    }

    #[test]
    fn test_rect_conversion() {
        let t = CoordinateTransform::new(DisplaySize::default(), letter()).unwrap();
        let logical = Rect::new(100.0, 220.0, 200.0, 330.0);
        let back = t.rect_to_logical(t.rect_to_display(logical));
        assert!((back.left - logical.left).abs() < 1e-9);
        assert!((back.bottom - logical.bottom).abs() < 1e-9);
    }
}
