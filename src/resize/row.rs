use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::layout::CoordinateTransform;
use crate::model::ROW_SEAM_LIMIT;
use crate::types::{Axis, Grid};

/// Rendered vertical extent of one row, in display pixels.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f64,
    pub bottom: f64,
}

impl RowBounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

/// Replace every row's extent with the host's measured layout.
///
/// Rows are stacked by the host's flow layout, so the measurements are
/// already final: each row (and its cells) takes the converted values as-is.
/// Nothing is shifted or corrected here. Consecutive measurements must touch
/// within `tolerance_px` and never by more than [`ROW_SEAM_LIMIT`] logical
/// units, and each row must start and end no higher than the one above it.
/// Anything else means the host layout is inconsistent and is rejected.
///
/// # Errors
/// [`GridError::RowCountMismatch`] unless there is exactly one measurement
/// per row, [`GridError::InvertedRowBounds`] for a measurement with its
/// bottom above its top, [`GridError::NonAdjacentRowBounds`] for a gap or
/// overlap beyond the tolerance or a row that moves above its predecessor.
pub fn resize_rows(
    grid: &Grid,
    transform: &CoordinateTransform,
    measured: &[RowBounds],
    tolerance_px: f64,
) -> Result<Grid> {
    if measured.len() != grid.rows.len() {
        return Err(GridError::RowCountMismatch {
            expected: grid.rows.len(),
            actual: measured.len(),
        });
    }

    for (index, m) in measured.iter().enumerate() {
        if !m.top.is_finite() || !m.bottom.is_finite() || m.bottom < m.top {
            return Err(GridError::InvertedRowBounds { index });
        }
    }

    let tolerance = tolerance_px.max(0.0);
    for (index, pair) in measured.windows(2).enumerate() {
        if let [upper, lower] = pair {
            let gap = lower.top - upper.bottom;
            let seam = transform.to_logical(lower.top, Axis::Y)
                - transform.to_logical(upper.bottom, Axis::Y);
            if gap.abs() > tolerance
                || seam.abs() > ROW_SEAM_LIMIT
                || lower.top < upper.top
                || lower.bottom < upper.bottom
            {
                return Err(GridError::NonAdjacentRowBounds { index, gap });
            }
        }
    }

    let mut next = grid.clone();
    for (row, m) in next.rows.iter_mut().zip(measured) {
        row.top = transform.to_logical(m.top, Axis::Y);
        row.bottom = transform.to_logical(m.bottom, Axis::Y);
        for cell in &mut row.cells {
            cell.top = row.top;
            cell.bottom = row.bottom;
        }
    }

    if let Some(first) = next.rows.first() {
        next.top = first.top;
    }
    if let Some(last) = next.rows.last() {
        next.bottom = last.bottom;
    }

    log::debug!(
        "re-measured {} rows, grid now spans [{}, {}]",
        next.rows.len(),
        next.top,
        next.bottom
    );
    Ok(next)
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
    use crate::types::{Cell, Column, Page, Rect, Row};

    fn grid() -> Grid {
        let columns = vec![Column {
            index: 0,
            left: 0.0,
            right: 100.0,
        }];
        let rows = (0..3)
            .map(|index| {
                let top = index as f64 * 100.0;
                let bottom = top + 100.0;
                Row {
                    index,
                    top,
                    bottom,
                    cells: vec![Cell {
                        column_index: 0,
                        row_index: index,
                        left: 0.0,
                        top,
                        right: 100.0,
                        bottom,
                        content: String::new(),
                        reviewed: false,
                    }],
                }
            })
            .collect();
        Grid::new(
            Page {
                width: 100.0,
                height: 400.0,
            },
            Rect::new(0.0, 0.0, 100.0, 300.0),
            columns,
            rows,
        )
        .unwrap()
    }

    // 2px per logical unit vertically
    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(
            DisplaySize {
                width: 100.0,
                height: 800.0,
            },
            Page {
                width: 100.0,
                height: 400.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_measurements_become_rows() {
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(200.0, 500.0),
            RowBounds::new(500.0, 700.0),
        ];
        let next = resize_rows(&grid(), &transform(), &measured, 0.5).unwrap();

        assert_eq!(next.rows()[1].top, 100.0);
        assert_eq!(next.rows()[1].bottom, 250.0);
        assert_eq!(next.rows()[2].top, 250.0);
        assert_eq!(next.bounds().bottom, 350.0);
        let cell = next.cell(2, 0).unwrap();
        assert_eq!((cell.top, cell.bottom), (250.0, 350.0));
    }

    #[test]
    fn test_count_mismatch() {
        let err = resize_rows(&grid(), &transform(), &[RowBounds::new(0.0, 10.0)], 0.5).unwrap_err();
        assert!(matches!(
            err,
            GridError::RowCountMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_gap_rejected() {
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(200.0, 300.0),
            RowBounds::new(310.0, 400.0),
        ];
        let err = resize_rows(&grid(), &transform(), &measured, 0.5).unwrap_err();
        assert!(matches!(err, GridError::NonAdjacentRowBounds { index: 1, .. }));
    }

    #[test]
    fn test_gap_within_tolerance_kept() {
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(200.4, 400.0),
            RowBounds::new(400.0, 600.0),
        ];
        let next = resize_rows(&grid(), &transform(), &measured, 0.5).unwrap();
        assert_eq!(next.rows()[0].bottom, 100.0);
        assert_eq!(next.rows()[1].top, 100.2);
    }

    #[test]
    fn test_overlap_within_tolerance_cannot_reorder_rows() {
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(200.4, 200.6),
            RowBounds::new(200.2, 600.0),
        ];
        let err = resize_rows(&grid(), &transform(), &measured, 0.5).unwrap_err();
        assert!(matches!(err, GridError::NonAdjacentRowBounds { index: 1, .. }));
    }

    #[test]
    fn test_tolerance_capped_by_seam_limit() {
        // 4px at 2px per unit is a 2 unit seam
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(204.0, 400.0),
            RowBounds::new(400.0, 600.0),
        ];
        let err = resize_rows(&grid(), &transform(), &measured, 10.0).unwrap_err();
        assert!(matches!(err, GridError::NonAdjacentRowBounds { index: 0, .. }));
    }

    #[test]
    fn test_result_passes_validation() {
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(200.4, 400.0),
            RowBounds::new(399.8, 600.0),
        ];
        let next = resize_rows(&grid(), &transform(), &measured, 0.5).unwrap();
        next.validate().unwrap();
    }

    #[test]
    fn test_inverted_measurement() {
        let measured = [
            RowBounds::new(0.0, 200.0),
            RowBounds::new(200.0, 100.0),
            RowBounds::new(100.0, 600.0),
        ];
        let err = resize_rows(&grid(), &transform(), &measured, 0.5).unwrap_err();
        assert!(matches!(err, GridError::InvertedRowBounds { index: 1 }));
    }
}
