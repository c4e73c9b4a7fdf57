//! Test fixtures for building consistent grids in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::GridBuilder;
//!
//! let grid = GridBuilder::new()
//!     .columns(&[0.0, 50.0, 120.0, 200.0])
//!     .rows(&[0.0, 30.0, 60.0])
//!     .content(0, 1, "Name")
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use ocrgrid::{
    Cell, Column, CoordinateTransform, DisplaySize, EditorConfig, Grid, Page, Rect, Row,
};

// ============================================================================
// Grid Builder
// ============================================================================

/// Builder for grids given as column and row boundary positions.
pub struct GridBuilder {
    page: Page,
    column_edges: Vec<f64>,
    row_edges: Vec<f64>,
    padding: (f64, f64),
    missing: Vec<(usize, usize)>,
    contents: Vec<(usize, usize, String)>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBuilder {
    /// US letter page (850x1100 logical units), no columns or rows yet.
    pub fn new() -> Self {
        Self {
            page: Page {
                width: 850.0,
                height: 1100.0,
            },
            column_edges: Vec::new(),
            row_edges: Vec::new(),
            padding: (0.0, 0.0),
            missing: Vec::new(),
            contents: Vec::new(),
        }
    }

    pub fn page(mut self, width: f64, height: f64) -> Self {
        self.page = Page { width, height };
        self
    }

    /// Column boundaries left to right; `n + 1` edges make `n` columns.
    pub fn columns(mut self, edges: &[f64]) -> Self {
        self.column_edges = edges.to_vec();
        self
    }

    /// Row boundaries top to bottom; `n + 1` edges make `n` rows.
    pub fn rows(mut self, edges: &[f64]) -> Self {
        self.row_edges = edges.to_vec();
        self
    }

    /// Empty margin between the outer bounds and the first/last column.
    pub fn padding(mut self, left: f64, right: f64) -> Self {
        self.padding = (left, right);
        self
    }

    /// Leave the cell at `(row, column)` out, as extractors sometimes do.
    pub fn without_cell(mut self, row: usize, column: usize) -> Self {
        self.missing.push((row, column));
        self
    }

    pub fn content(mut self, row: usize, column: usize, text: &str) -> Self {
        self.contents.push((row, column, text.to_string()));
        self
    }

    pub fn build(self) -> Grid {
        let columns: Vec<Column> = self
            .column_edges
            .windows(2)
            .enumerate()
            .map(|(index, w)| Column {
                index,
                left: w[0],
                right: w[1],
            })
            .collect();

        let rows: Vec<Row> = self
            .row_edges
            .windows(2)
            .enumerate()
            .map(|(index, w)| Row {
                index,
                top: w[0],
                bottom: w[1],
                cells: columns
                    .iter()
                    .filter(|c| !self.missing.contains(&(index, c.index)))
                    .map(|c| Cell {
                        column_index: c.index,
                        row_index: index,
                        left: c.left,
                        top: w[0],
                        right: c.right,
                        bottom: w[1],
                        content: self
                            .contents
                            .iter()
                            .find(|(r, col, _)| *r == index && *col == c.index)
                            .map(|(_, _, t)| t.clone())
                            .unwrap_or_default(),
                        reviewed: false,
                    })
                    .collect(),
            })
            .collect();

        let bounds = Rect::new(
            self.column_edges[0] - self.padding.0,
            self.row_edges[0],
            self.column_edges[self.column_edges.len() - 1] + self.padding.1,
            self.row_edges[self.row_edges.len() - 1],
        );

        Grid::new(self.page, bounds, columns, rows).expect("fixture grid should be valid")
    }
}

// ============================================================================
// Ready-made grids
// ============================================================================

/// Three columns `[0,50] [50,120] [120,200]` over three 30-unit rows.
pub fn three_column_grid() -> Grid {
    GridBuilder::new()
        .columns(&[0.0, 50.0, 120.0, 200.0])
        .rows(&[0.0, 30.0, 60.0, 90.0])
        .build()
}

/// A realistic table placed mid-page with outer padding and a missing cell.
pub fn signature_sheet_grid() -> Grid {
    GridBuilder::new()
        .columns(&[72.0, 180.0, 395.5, 560.25, 778.0])
        .rows(&[210.0, 236.5, 263.0, 289.5, 316.0, 342.5])
        .padding(12.0, 20.0)
        .without_cell(3, 2)
        .content(0, 0, "Name")
        .content(0, 1, "Address")
        .content(1, 0, "J. Doe")
        .build()
}

/// Reference display (1100x800 px) over a letter page.
pub fn letter_transform() -> CoordinateTransform {
    CoordinateTransform::new(
        DisplaySize::default(),
        Page {
            width: 850.0,
            height: 1100.0,
        },
    )
    .unwrap()
}

/// Config whose display matches the page, so pixels equal logical units.
pub fn identity_config(grid: &Grid) -> EditorConfig {
    EditorConfig::default().with_display(grid.page().width, grid.page().height)
}
