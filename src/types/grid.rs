use serde::{Deserialize, Serialize};

use super::Rect;

/// Logical dimensions of one page of the source document.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
}

/// A table column in logical units.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Column {
    pub index: usize,
    pub left: f64,
    pub right: f64,
}

impl Column {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// A table row in logical units, owning the cells laid out on it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Cell in this row at `column`, if the extractor produced one.
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column_index == column)
    }
}

/// A single table cell. Its extent always mirrors its column and row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column_index: usize,
    pub row_index: usize,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub reviewed: bool,
}

impl Cell {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Full table geometry for one page.
///
/// Columns and rows are the source of truth; cells are kept in lock-step.
/// A `Grid` can only be obtained through validated construction
/// ([`Grid::new`], deserialization, OCR import) or a resize operation, so
/// every value in circulation satisfies the grid invariants.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "GridSnapshot")]
pub struct Grid {
    pub(crate) page: Page,
    pub(crate) left: f64,
    pub(crate) top: f64,
    pub(crate) right: f64,
    pub(crate) bottom: f64,
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
}

/// Unvalidated wire shape of a [`Grid`].
#[derive(Debug, Deserialize, Clone)]
pub struct GridSnapshot {
    pub page: Page,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}
