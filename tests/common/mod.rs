//! Common test utilities and assertion helpers.
//!
//! Invariant checks shared by the resize, session, and import tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use ocrgrid::Grid;

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Adjacent columns and rows share their boundary exactly.
pub fn assert_adjacent(grid: &Grid) {
    for pair in grid.columns().windows(2) {
        assert_eq!(
            pair[0].right, pair[1].left,
            "columns {} and {} do not touch",
            pair[0].index, pair[1].index
        );
    }
    for pair in grid.rows().windows(2) {
        assert_eq!(
            pair[0].bottom, pair[1].top,
            "rows {} and {} do not touch",
            pair[0].index, pair[1].index
        );
    }
}

/// Every cell mirrors its column and row.
pub fn assert_lock_step(grid: &Grid) {
    for cell in grid.cells() {
        let col = &grid.columns()[cell.column_index];
        let row = &grid.rows()[cell.row_index];
        assert_eq!(
            (cell.left, cell.right),
            (col.left, col.right),
            "cell ({}, {}) drifted from its column",
            cell.row_index,
            cell.column_index
        );
        assert_eq!(
            (cell.top, cell.bottom),
            (row.top, row.bottom),
            "cell ({}, {}) drifted from its row",
            cell.row_index,
            cell.column_index
        );
    }
}

/// Outer bounds enclose the columns and match the rows.
pub fn assert_outer_bounds(grid: &Grid) {
    let b = grid.bounds();
    let first = grid.columns().first().unwrap();
    let last = grid.columns().last().unwrap();
    assert!(b.left <= first.left, "left bound inside first column");
    assert!(b.right >= last.right, "right bound inside last column");
    assert_eq!(b.top, grid.rows().first().unwrap().top);
    assert_eq!(b.bottom, grid.rows().last().unwrap().bottom);
}

/// All structural invariants at once.
pub fn assert_grid_invariants(grid: &Grid) {
    assert_adjacent(grid);
    assert_lock_step(grid);
    assert_outer_bounds(grid);
    grid.validate().expect("grid should validate");
}

/// `a` and `b` agree within `tol`.
pub fn assert_approx(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} != {b} (tolerance {tol})");
}
