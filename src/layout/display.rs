//! Pixel-space view of a grid for the rendering host.
//!
//! Computed on demand from a logical grid snapshot, never stored back into it.

use serde::Serialize;

use super::CoordinateTransform;
use crate::types::{Axis, Grid, Rect};

/// Rectangle in display pixels, in the shape renderers position elements with.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    /// X position (left edge)
    pub left: f64,
    /// Y position (top edge)
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    fn from_logical(rect: Rect, transform: &CoordinateTransform) -> Self {
        let px = transform.rect_to_display(rect);
        Self {
            left: px.left,
            top: px.top,
            width: px.width(),
            height: px.height(),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A cell positioned in display pixels.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DisplayCell {
    pub row: usize,
    pub column: usize,
    pub rect: DisplayRect,
    pub content: String,
    pub reviewed: bool,
}

/// Which axes the host should currently draw.
///
/// While one axis is being dragged, the other is hidden so stale cell
/// geometry is never shown mid-gesture.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub columns: bool,
    pub rows: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            columns: true,
            rows: true,
        }
    }
}

/// Display-pixel layout of a whole grid.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLayout {
    pub bounds: DisplayRect,
    /// Column rects spanning the full grid height.
    pub columns: Vec<DisplayRect>,
    /// Row rects spanning the full grid width.
    pub rows: Vec<DisplayRect>,
    pub cells: Vec<DisplayCell>,
    pub visibility: Visibility,
}

impl DisplayLayout {
    /// Project every rectangle of `grid` into display pixels.
    pub fn compute(grid: &Grid, transform: &CoordinateTransform, visibility: Visibility) -> Self {
        let bounds = grid.bounds();

        let columns = grid
            .columns()
            .iter()
            .map(|c| {
                DisplayRect::from_logical(
                    Rect::new(c.left, bounds.top, c.right, bounds.bottom),
                    transform,
                )
            })
            .collect();

        let rows = grid
            .rows()
            .iter()
            .map(|r| {
                DisplayRect::from_logical(
                    Rect::new(bounds.left, r.top, bounds.right, r.bottom),
                    transform,
                )
            })
            .collect();

        let cells = grid
            .cells()
            .map(|c| DisplayCell {
                row: c.row_index,
                column: c.column_index,
                rect: DisplayRect::from_logical(c.rect(), transform),
                content: c.content.clone(),
                reviewed: c.reviewed,
            })
            .collect();

        Self {
            bounds: DisplayRect::from_logical(bounds, transform),
            columns,
            rows,
            cells,
            visibility,
        }
    }

    /// Column under pixel `x` (binary search), `None` outside the columns.
    pub fn column_at_x(&self, x: f64) -> Option<usize> {
        span_at(&self.columns, x, |r| (r.left, r.right()))
    }

    /// Row under pixel `y` (binary search), `None` outside the rows.
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        span_at(&self.rows, y, |r| (r.top, r.bottom()))
    }

    /// Pixel position of every internal and external column boundary.
    pub fn column_edges(&self) -> Vec<f64> {
        edges(&self.columns, |r| (r.left, r.right()))
    }

    /// Pixel position of every internal and external row boundary.
    pub fn row_edges(&self) -> Vec<f64> {
        edges(&self.rows, |r| (r.top, r.bottom()))
    }

    /// Pixel extent of the given axis for item `index`.
    pub fn span(&self, axis: Axis, index: usize) -> Option<(f64, f64)> {
        match axis {
            Axis::X => self.columns.get(index).map(|r| (r.left, r.right())),
            Axis::Y => self.rows.get(index).map(|r| (r.top, r.bottom())),
        }
    }
}

/// Spans are ordered, so the candidate is the last span starting at or before `pos`.
fn span_at(spans: &[DisplayRect], pos: f64, extent: impl Fn(&DisplayRect) -> (f64, f64)) -> Option<usize> {
    let idx = spans
        .partition_point(|r| extent(r).0 <= pos)
        .checked_sub(1)?;
    let (start, end) = extent(spans.get(idx)?);
    (pos >= start && pos < end).then_some(idx)
}

fn edges(spans: &[DisplayRect], extent: impl Fn(&DisplayRect) -> (f64, f64)) -> Vec<f64> {
    let mut out: Vec<f64> = spans.iter().map(|r| extent(r).0).collect();
    if let Some(last) = spans.last() {
        out.push(extent(last).1);
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::DisplaySize;
    use crate::types::{Cell, Column, Page, Row};

    fn grid() -> Grid {
        let columns = vec![
            Column {
                index: 0,
                left: 0.0,
                right: 50.0,
            },
            Column {
                index: 1,
                left: 50.0,
                right: 100.0,
            },
        ];
        let rows = vec![Row {
            index: 0,
            top: 0.0,
            bottom: 40.0,
            cells: vec![Cell {
                column_index: 1,
                row_index: 0,
                left: 50.0,
                top: 0.0,
                right: 100.0,
                bottom: 40.0,
                content: "42".into(),
                reviewed: true,
            }],
        }];
        Grid::new(
            Page {
                width: 100.0,
                height: 100.0,
            },
            Rect::new(0.0, 0.0, 100.0, 40.0),
            columns,
            rows,
        )
        .unwrap()
    }

    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(
            DisplaySize {
                width: 200.0,
                height: 50.0,
            },
            Page {
                width: 100.0,
                height: 100.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_compute_scales_rects() {
        let layout = DisplayLayout::compute(&grid(), &transform(), Visibility::default());

        assert_eq!(layout.bounds.width, 200.0);
        assert_eq!(layout.bounds.height, 20.0);
        assert_eq!(layout.columns[1].left, 100.0);
        assert_eq!(layout.columns[1].width, 100.0);
        assert_eq!(layout.columns[1].height, 20.0);
        assert_eq!(layout.cells.len(), 1);
        assert_eq!(layout.cells[0].rect.left, 100.0);
        assert_eq!(layout.cells[0].content, "42");
        assert!(layout.cells[0].reviewed);
    }

    #[test]
    fn test_column_at_x() {
        let layout = DisplayLayout::compute(&grid(), &transform(), Visibility::default());
        assert_eq!(layout.column_at_x(0.0), Some(0));
        assert_eq!(layout.column_at_x(99.9), Some(0));
        assert_eq!(layout.column_at_x(100.0), Some(1));
        assert_eq!(layout.column_at_x(200.0), None);
        assert_eq!(layout.column_at_x(-1.0), None);
    }

    #[test]
    fn test_row_at_y() {
        let layout = DisplayLayout::compute(&grid(), &transform(), Visibility::default());
        assert_eq!(layout.row_at_y(10.0), Some(0));
        assert_eq!(layout.row_at_y(25.0), None);
    }

    #[test]
    fn test_edges() {
        let layout = DisplayLayout::compute(&grid(), &transform(), Visibility::default());
        assert_eq!(layout.column_edges(), vec![0.0, 100.0, 200.0]);
        assert_eq!(layout.row_edges(), vec![0.0, 20.0]);
    }
}
