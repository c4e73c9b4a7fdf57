use std::cmp::Ordering;

use crate::error::{GridError, Result};
use crate::layout::CoordinateTransform;
use crate::types::{Axis, Grid};

/// Set column `column_index` to `new_width` logical units.
///
/// The column's right edge moves by the width delta and every column and
/// cell to its right is translated by the same delta, so adjacency and cell
/// lock-step hold across the whole grid. Columns left of `column_index` are
/// never touched. The outer right bound moves with the rightmost column,
/// keeping any right-hand padding unchanged.
///
/// # Errors
/// [`GridError::ColumnOutOfRange`] for a bad index, [`GridError::InvalidWidth`]
/// if `new_width` is not a positive finite number.
pub fn resize_column(grid: &Grid, column_index: usize, new_width: f64) -> Result<Grid> {
    let column = grid
        .columns
        .get(column_index)
        .ok_or(GridError::ColumnOutOfRange {
            index: column_index,
            len: grid.columns.len(),
        })?;
    if !new_width.is_finite() || new_width <= 0.0 {
        return Err(GridError::InvalidWidth(new_width));
    }

    let delta = new_width - column.width();
    let mut next = grid.clone();

    for col in next.columns.iter_mut().skip(column_index) {
        if col.index == column_index {
            col.right += delta;
        } else {
            col.left += delta;
            col.right += delta;
        }
    }

    for cell in next.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
        match cell.column_index.cmp(&column_index) {
            Ordering::Less => {}
            Ordering::Equal => cell.right += delta,
            Ordering::Greater => {
                cell.left += delta;
                cell.right += delta;
            }
        }
    }

    next.right += delta;

    log::debug!(
        "resized column {column_index} to {new_width} (delta {delta}), grid right now {}",
        next.right
    );
    Ok(next)
}

/// [`resize_column`] with the new width measured in display pixels.
///
/// # Errors
/// Same as [`resize_column`].
pub fn resize_column_px(
    grid: &Grid,
    transform: &CoordinateTransform,
    column_index: usize,
    new_width_px: f64,
) -> Result<Grid> {
    resize_column(grid, column_index, transform.to_logical(new_width_px, Axis::X))
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

    fn three_columns() -> Grid {
        let columns: Vec<Column> = [(0.0, 50.0), (50.0, 120.0), (120.0, 200.0)]
            .iter()
            .enumerate()
            .map(|(index, &(left, right))| Column { index, left, right })
            .collect();
        let cells = columns
            .iter()
            .map(|c| Cell {
                column_index: c.index,
                row_index: 0,
                left: c.left,
                top: 0.0,
                right: c.right,
                bottom: 20.0,
                content: String::new(),
                reviewed: false,
            })
            .collect();
        let rows = vec![Row {
            index: 0,
            top: 0.0,
            bottom: 20.0,
            cells,
        }];
        Grid::new(
            Page {
                width: 200.0,
                height: 100.0,
            },
            Rect::new(0.0, 0.0, 200.0, 20.0),
            columns,
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_widen_middle_column() {
        let grid = three_columns();
        let next = resize_column(&grid, 1, 90.0).unwrap();

        assert_eq!(next.columns()[0].left, 0.0);
        assert_eq!(next.columns()[0].right, 50.0);
        assert_eq!(next.columns()[1].left, 50.0);
        assert_eq!(next.columns()[1].right, 140.0);
        assert_eq!(next.columns()[2].left, 140.0);
        assert_eq!(next.columns()[2].right, 220.0);
        assert_eq!(next.bounds().right, 220.0);

        let cell = next.cell(0, 2).unwrap();
        assert_eq!((cell.left, cell.right), (140.0, 220.0));
        let cell = next.cell(0, 1).unwrap();
        assert_eq!((cell.left, cell.right), (50.0, 140.0));
    }

    #[test]
    fn test_input_untouched() {
        let grid = three_columns();
        let before = grid.clone();
        let _ = resize_column(&grid, 0, 10.0).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_rejects_bad_index() {
        let err = resize_column(&three_columns(), 3, 10.0).unwrap_err();
        assert!(matches!(err, GridError::ColumnOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_rejects_non_positive_width() {
        let grid = three_columns();
        assert!(matches!(
            resize_column(&grid, 0, 0.0),
            Err(GridError::InvalidWidth(_))
        ));
        assert!(matches!(
            resize_column(&grid, 0, f64::NAN),
            Err(GridError::InvalidWidth(_))
        ));
    }

    #[test]
    fn test_pixel_width_converted() {
        let grid = three_columns();
        let transform = CoordinateTransform::new(
            DisplaySize {
                width: 400.0,
                height: 100.0,
            },
            grid.page(),
        )
        .unwrap();
        // 2px per logical unit on X
        let next = resize_column_px(&grid, &transform, 0, 200.0).unwrap();
        assert_eq!(next.columns()[0].right, 100.0);
        assert_eq!(next.columns()[2].right, 250.0);
    }
}
