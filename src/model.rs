//! Grid construction, validation, and read accessors.
//!
//! Validation runs once when a snapshot enters the crate. Resize operations
//! keep the invariants by construction and never re-validate the whole grid.

use crate::error::{GridError, Result};
use crate::types::{Cell, Column, Grid, GridSnapshot, Page, Rect, Row};

/// Absolute tolerance (logical units) for boundary comparisons in validation.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Largest gap or overlap (logical units) allowed between consecutive rows.
///
/// Row extents come from the host's measured layout and are kept as
/// measured, so a row seam may be off by a fraction of a pixel. Columns have
/// no such allowance and must meet within [`GEOMETRY_EPSILON`].
pub const ROW_SEAM_LIMIT: f64 = 1.0;

/// True when `a` and `b` are within [`GEOMETRY_EPSILON`] of each other.
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= GEOMETRY_EPSILON
}

impl Grid {
    /// Build a grid from its parts, checking every structural invariant.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidGrid`] if columns or rows are empty, not
    /// contiguously indexed from 0, inverted, out of order, not adjacent
    /// (columns within [`GEOMETRY_EPSILON`], rows within [`ROW_SEAM_LIMIT`]),
    /// not contained by `bounds`, or if any cell references a missing row/column or does not
    /// match its column and row extents.
    pub fn new(page: Page, bounds: Rect, columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let grid = Grid {
            page,
            left: bounds.left,
            top: bounds.top,
            right: bounds.right,
            bottom: bounds.bottom,
            columns,
            rows,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Logical page the grid was extracted from.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Outer grid bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Cell at `(row, column)`, if one exists.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cell(column))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check every invariant the grid carries.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidGrid`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let bounds = self.bounds();
        if !all_finite(&[bounds.left, bounds.top, bounds.right, bounds.bottom]) {
            return Err(invalid("outer bounds are not finite"));
        }
        if !bounds.is_well_formed() {
            return Err(invalid("outer bounds are inverted"));
        }

        self.validate_columns()?;
        self.validate_rows()?;

        let (Some(first_col), Some(last_col)) = (self.columns.first(), self.columns.last()) else {
            return Err(invalid("grid has no columns"));
        };
        let (Some(first_row), Some(last_row)) = (self.rows.first(), self.rows.last()) else {
            return Err(invalid("grid has no rows"));
        };
        if self.left > first_col.left + GEOMETRY_EPSILON
            || self.right < last_col.right - GEOMETRY_EPSILON
        {
            return Err(invalid(format!(
                "outer bounds [{}, {}] do not contain columns [{}, {}]",
                self.left, self.right, first_col.left, last_col.right
            )));
        }
        if self.top > first_row.top + GEOMETRY_EPSILON
            || self.bottom < last_row.bottom - GEOMETRY_EPSILON
        {
            return Err(invalid(format!(
                "outer bounds [{}, {}] do not contain rows [{}, {}]",
                self.top, self.bottom, first_row.top, last_row.bottom
            )));
        }

        for row in &self.rows {
            self.validate_cells(row)?;
        }
        Ok(())
    }

    fn validate_columns(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(invalid("grid has no columns"));
        }
        let mut prev: Option<&Column> = None;
        for (i, col) in self.columns.iter().enumerate() {
            if col.index != i {
                return Err(invalid(format!(
                    "column at position {i} has index {}",
                    col.index
                )));
            }
            if !all_finite(&[col.left, col.right]) || col.left > col.right {
                return Err(invalid(format!(
                    "column {i} has invalid extent [{}, {}]",
                    col.left, col.right
                )));
            }
            if let Some(p) = prev {
                if !approx_eq(col.left, p.right) {
                    return Err(invalid(format!(
                        "column {i} starts at {} but column {} ends at {}",
                        col.left, p.index, p.right
                    )));
                }
            }
            prev = Some(col);
        }
        Ok(())
    }

    fn validate_rows(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(invalid("grid has no rows"));
        }
        let mut prev: Option<&Row> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row.index != i {
                return Err(invalid(format!(
                    "row at position {i} has index {}",
                    row.index
                )));
            }
            if !all_finite(&[row.top, row.bottom]) || row.top > row.bottom {
                return Err(invalid(format!(
                    "row {i} has invalid extent [{}, {}]",
                    row.top, row.bottom
                )));
            }
            if let Some(p) = prev {
                if row.top < p.top || row.bottom < p.bottom {
                    return Err(invalid(format!(
                        "row {i} is not below row {}",
                        p.index
                    )));
                }
                if (row.top - p.bottom).abs() > ROW_SEAM_LIMIT + GEOMETRY_EPSILON {
                    return Err(invalid(format!(
                        "row {i} starts at {} but row {} ends at {}",
                        row.top, p.index, p.bottom
                    )));
                }
            }
            prev = Some(row);
        }
        Ok(())
    }

    fn validate_cells(&self, row: &Row) -> Result<()> {
        let mut prev_column: Option<usize> = None;
        for cell in &row.cells {
            if cell.row_index != row.index {
                return Err(invalid(format!(
                    "cell in row {} references row {}",
                    row.index, cell.row_index
                )));
            }
            let Some(col) = self.columns.get(cell.column_index) else {
                return Err(invalid(format!(
                    "cell in row {} references missing column {}",
                    row.index, cell.column_index
                )));
            };
            if prev_column.is_some_and(|p| p >= cell.column_index) {
                return Err(invalid(format!(
                    "cells in row {} are not ordered by column (column {})",
                    row.index, cell.column_index
                )));
            }
            prev_column = Some(cell.column_index);

            if !approx_eq(cell.left, col.left)
                || !approx_eq(cell.right, col.right)
                || !approx_eq(cell.top, row.top)
                || !approx_eq(cell.bottom, row.bottom)
            {
                return Err(invalid(format!(
                    "cell ({}, {}) does not match its row and column extents",
                    row.index, cell.column_index
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = GridError;

    fn try_from(s: GridSnapshot) -> Result<Self> {
        Grid::new(
            s.page,
            Rect::new(s.left, s.top, s.right, s.bottom),
            s.columns,
            s.rows,
        )
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn invalid(msg: impl Into<String>) -> GridError {
    GridError::InvalidGrid(msg.into())
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

    fn page() -> Page {
        Page {
            width: 850.0,
            height: 1100.0,
        }
    }

    fn cols(bounds: &[(f64, f64)]) -> Vec<Column> {
        bounds
            .iter()
            .enumerate()
            .map(|(index, &(left, right))| Column { index, left, right })
            .collect()
    }

    fn row(index: usize, top: f64, bottom: f64, columns: &[Column]) -> Row {
        Row {
            index,
            top,
            bottom,
            cells: columns
                .iter()
                .map(|c| Cell {
                    column_index: c.index,
                    row_index: index,
                    left: c.left,
                    top,
                    right: c.right,
                    bottom,
                    content: String::new(),
                    reviewed: false,
                })
                .collect(),
        }
    }

    #[test]
    fn test_valid_grid() {
        let columns = cols(&[(0.0, 50.0), (50.0, 120.0)]);
        let rows = vec![row(0, 10.0, 30.0, &columns), row(1, 30.0, 60.0, &columns)];
        let grid = Grid::new(page(), Rect::new(0.0, 10.0, 120.0, 60.0), columns, rows).unwrap();

        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.cells().count(), 4);
        assert_eq!(grid.cell(1, 1).unwrap().left, 50.0);
        assert!(grid.cell(2, 0).is_none());
    }

    #[test]
    fn test_rejects_gap_in_column_indices() {
        let mut columns = cols(&[(0.0, 50.0), (50.0, 120.0)]);
        columns[1].index = 2;
        let rows = vec![row(0, 0.0, 30.0, &[])];
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 120.0, 30.0), columns, rows).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_rejects_out_of_order_rows() {
        let columns = cols(&[(0.0, 50.0)]);
        let rows = vec![row(0, 30.0, 60.0, &columns), row(1, 0.0, 30.0, &columns)];
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 50.0, 60.0), columns, rows).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_rejects_cell_with_missing_column() {
        let columns = cols(&[(0.0, 50.0)]);
        let mut r = row(0, 0.0, 30.0, &columns);
        r.cells[0].column_index = 3;
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 50.0, 30.0), columns, vec![r]).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_rejects_cell_out_of_lock_step() {
        let columns = cols(&[(0.0, 50.0)]);
        let mut r = row(0, 0.0, 30.0, &columns);
        r.cells[0].right = 49.0;
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 50.0, 30.0), columns, vec![r]).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_rejects_column_gap() {
        let columns = cols(&[(0.0, 50.0), (60.0, 120.0)]);
        let rows = vec![row(0, 0.0, 30.0, &columns)];
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 120.0, 30.0), columns, rows).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_rejects_column_overlap() {
        let columns = cols(&[(0.0, 50.0), (40.0, 120.0)]);
        let rows = vec![row(0, 0.0, 30.0, &columns)];
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 120.0, 30.0), columns, rows).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_column_seam_within_epsilon() {
        let columns = cols(&[(0.0, 50.0), (50.0 + GEOMETRY_EPSILON / 2.0, 120.0)]);
        let rows = vec![row(0, 0.0, 30.0, &columns)];
        assert!(Grid::new(page(), Rect::new(0.0, 0.0, 120.0, 30.0), columns, rows).is_ok());
    }

    #[test]
    fn test_row_seam_limit() {
        let columns = cols(&[(0.0, 50.0)]);
        let small = vec![row(0, 0.0, 30.0, &columns), row(1, 30.5, 60.0, &columns)];
        assert!(Grid::new(page(), Rect::new(0.0, 0.0, 50.0, 60.0), columns.clone(), small).is_ok());

        let gap = vec![row(0, 0.0, 30.0, &columns), row(1, 35.0, 60.0, &columns)];
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 50.0, 60.0), columns.clone(), gap).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));

        let overlap = vec![row(0, 0.0, 30.0, &columns), row(1, 25.0, 60.0, &columns)];
        let err = Grid::new(page(), Rect::new(0.0, 0.0, 50.0, 60.0), columns, overlap).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_outer_padding_allowed() {
        let columns = cols(&[(10.0, 50.0)]);
        let rows = vec![row(0, 0.0, 30.0, &columns)];
        assert!(Grid::new(page(), Rect::new(0.0, 0.0, 70.0, 30.0), columns, rows).is_ok());
    }

    #[test]
    fn test_bounds_must_contain_columns() {
        let columns = cols(&[(0.0, 50.0)]);
        let rows = vec![row(0, 0.0, 30.0, &columns)];
        let err = Grid::new(page(), Rect::new(5.0, 0.0, 50.0, 30.0), columns, rows).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{
            "page": {"width": 100.0, "height": 100.0},
            "left": 0.0, "top": 0.0, "right": 10.0, "bottom": 10.0,
            "columns": [{"index": 1, "left": 0.0, "right": 10.0}],
            "rows": [{"index": 0, "top": 0.0, "bottom": 10.0}]
        }"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }
}
