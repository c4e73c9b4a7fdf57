//! Import of table extraction output into a [`Grid`].
//!
//! The extractor reports cells with their own boxes and a column index, and
//! rows by number. Columns and rows are not listed explicitly, so their
//! extents are derived from the cells, and boundaries that the extractor
//! left slightly apart are joined at their midpoint. After import the grid is
//! fully consistent and the resize engine never corrects anything again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::{Cell, Column, Grid, Page, Rect, Row};

/// Page size as reported by the extractor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OcrPage {
    pub width: f64,
    pub height: f64,
}

/// Document metadata wrapper some extractor outputs nest pages under.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OcrSheet {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
}

/// One recognized cell.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OcrCell {
    pub column_index: usize,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    #[serde(default)]
    pub text: String,
}

/// One recognized row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OcrRow {
    pub row_number: u32,
    #[serde(default)]
    pub cells: Vec<OcrCell>,
}

/// Complete extractor output for one table.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OcrTable {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_sheet: Option<OcrSheet>,
    #[serde(default)]
    pub rows: Vec<OcrRow>,
}

impl OcrTable {
    /// Parse extractor JSON.
    ///
    /// # Errors
    /// Returns [`GridError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Page `index`, looking in the nested sheet metadata first.
    pub fn page(&self, index: usize) -> Option<OcrPage> {
        self.signature_sheet
            .as_ref()
            .and_then(|s| s.pages.get(index))
            .or_else(|| self.pages.get(index))
            .copied()
    }
}

impl Grid {
    /// Build a grid from extractor output for page `page_index`.
    ///
    /// Rows are ordered by row number and re-indexed from 0. A column spans
    /// the union of its cells, a row the union of its cells, and touching
    /// boundaries are made to coincide exactly.
    ///
    /// # Errors
    /// [`GridError::InvalidGrid`] if the page is missing, there are no rows,
    /// a row number or `(row, column)` pair repeats, a row has no cells,
    /// column indices are not contiguous from 0, or the derived geometry
    /// fails validation.
    pub fn from_ocr(table: &OcrTable, page_index: usize) -> Result<Self> {
        let page = table
            .page(page_index)
            .ok_or_else(|| invalid(format!("page {page_index} not found")))?;

        let mut ordered: Vec<&OcrRow> = table.rows.iter().collect();
        ordered.sort_by_key(|r| r.row_number);
        if ordered.is_empty() {
            return Err(invalid("table has no rows"));
        }
        if let Some(pair) = ordered
            .windows(2)
            .find(|w| matches!(w, [a, b] if a.row_number == b.row_number))
        {
            let number = pair.first().map_or(0, |r| r.row_number);
            return Err(invalid(format!("row number {number} appears twice")));
        }

        let mut columns = derive_columns(&ordered)?;
        let mut rows = derive_rows(&ordered)?;
        join_columns(&mut columns);
        join_rows(&mut rows);

        for (row, source) in rows.iter_mut().zip(&ordered) {
            let mut cells: Vec<&OcrCell> = source.cells.iter().collect();
            cells.sort_by_key(|c| c.column_index);
            for cell in cells {
                if row.cell(cell.column_index).is_some() {
                    return Err(invalid(format!(
                        "row {} has two cells in column {}",
                        source.row_number, cell.column_index
                    )));
                }
                let column = columns
                    .get(cell.column_index)
                    .ok_or_else(|| invalid(format!("missing column {}", cell.column_index)))?;
                row.cells.push(Cell {
                    column_index: cell.column_index,
                    row_index: row.index,
                    left: column.left,
                    top: row.top,
                    right: column.right,
                    bottom: row.bottom,
                    content: cell.text.clone(),
                    reviewed: false,
                });
            }
        }

        let bounds = match (columns.first(), columns.last(), rows.first(), rows.last()) {
            (Some(fc), Some(lc), Some(fr), Some(lr)) => {
                Rect::new(fc.left, fr.top, lc.right, lr.bottom)
            }
            _ => return Err(invalid("table has no geometry")),
        };

        log::info!(
            "imported table: {} columns x {} rows on {}x{} page",
            columns.len(),
            rows.len(),
            page.width,
            page.height
        );

        Grid::new(
            Page {
                width: page.width,
                height: page.height,
            },
            bounds,
            columns,
            rows,
        )
    }

    /// Parse extractor JSON and import page `page_index`.
    ///
    /// # Errors
    /// Any error from [`OcrTable::from_json`] or [`Grid::from_ocr`].
    pub fn from_ocr_json(json: &str, page_index: usize) -> Result<Self> {
        Grid::from_ocr(&OcrTable::from_json(json)?, page_index)
    }
}

fn derive_columns(rows: &[&OcrRow]) -> Result<Vec<Column>> {
    let mut extents: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    for cell in rows.iter().flat_map(|r| r.cells.iter()) {
        let entry = extents
            .entry(cell.column_index)
            .or_insert((cell.left, cell.right));
        entry.0 = entry.0.min(cell.left);
        entry.1 = entry.1.max(cell.right);
    }
    if extents.is_empty() {
        return Err(invalid("table has no cells"));
    }

    extents
        .into_iter()
        .enumerate()
        .map(|(position, (index, (left, right)))| {
            if position == index {
                Ok(Column { index, left, right })
            } else {
                Err(invalid(format!("column {position} has no cells")))
            }
        })
        .collect()
}

fn derive_rows(rows: &[&OcrRow]) -> Result<Vec<Row>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let top = row.cells.iter().map(|c| c.top).reduce(f64::min);
            let bottom = row.cells.iter().map(|c| c.bottom).reduce(f64::max);
            match (top, bottom) {
                (Some(top), Some(bottom)) => Ok(Row {
                    index,
                    top,
                    bottom,
                    cells: Vec::new(),
                }),
                _ => Err(invalid(format!("row {} has no cells", row.row_number))),
            }
        })
        .collect()
}

fn join_columns(columns: &mut [Column]) {
    for i in 1..columns.len() {
        let (head, tail) = columns.split_at_mut(i);
        if let (Some(prev), Some(next)) = (head.last_mut(), tail.first_mut()) {
            let mid = midpoint(prev.right, next.left);
            prev.right = mid;
            next.left = mid;
        }
    }
}

fn join_rows(rows: &mut [Row]) {
    for i in 1..rows.len() {
        let (head, tail) = rows.split_at_mut(i);
        if let (Some(prev), Some(next)) = (head.last_mut(), tail.first_mut()) {
            let mid = midpoint(prev.bottom, next.top);
            prev.bottom = mid;
            next.top = mid;
        }
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    a + (b - a) / 2.0
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

    const SAMPLE: &str = r#"{
        "SignatureSheet": { "Pages": [{ "Width": 850, "Height": 1100 }] },
        "Rows": [
            { "RowNumber": 2, "Cells": [
                { "ColumnIndex": 1, "Left": 201, "Top": 131, "Right": 400, "Bottom": 160, "Text": "Smith" },
                { "ColumnIndex": 0, "Left": 100, "Top": 130, "Right": 199, "Bottom": 160 }
            ]},
            { "RowNumber": 1, "Cells": [
                { "ColumnIndex": 0, "Left": 100, "Top": 100, "Right": 200, "Bottom": 130, "Text": "Name" },
                { "ColumnIndex": 1, "Left": 200, "Top": 100, "Right": 402, "Bottom": 128 }
            ]}
        ]
    }"#;

    #[test]
    fn test_import_sample() {
        let grid = Grid::from_ocr_json(SAMPLE, 0).unwrap();

        assert_eq!(grid.page().width, 850.0);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.row_count(), 2);

        // 199/200 right edges against 200/201 left edges meet in the middle
        assert_eq!(grid.columns()[0].right, 200.0);
        assert_eq!(grid.columns()[1].left, 200.0);
        assert_eq!(grid.columns()[1].right, 402.0);
        assert_eq!(grid.rows()[0].bottom, 130.0);
        assert_eq!(grid.rows()[1].top, 130.0);
        assert_eq!(grid.bounds(), Rect::new(100.0, 100.0, 402.0, 160.0));

        assert_eq!(grid.cell(0, 0).unwrap().content, "Name");
        assert_eq!(grid.cell(1, 1).unwrap().content, "Smith");
        assert_eq!(grid.cell(1, 1).unwrap().left, 200.0);
    }

    #[test]
    fn test_top_level_pages() {
        let json = r#"{
            "Pages": [{ "Width": 10, "Height": 10 }],
            "Rows": [{ "RowNumber": 0, "Cells": [
                { "ColumnIndex": 0, "Left": 0, "Top": 0, "Right": 5, "Bottom": 5 }
            ]}]
        }"#;
        let grid = Grid::from_ocr_json(json, 0).unwrap();
        assert_eq!(grid.page().height, 10.0);
    }

    #[test]
    fn test_missing_page() {
        let err = Grid::from_ocr_json(SAMPLE, 1).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_column_gap_rejected() {
        let json = r#"{
            "Pages": [{ "Width": 10, "Height": 10 }],
            "Rows": [{ "RowNumber": 0, "Cells": [
                { "ColumnIndex": 0, "Left": 0, "Top": 0, "Right": 5, "Bottom": 5 },
                { "ColumnIndex": 2, "Left": 5, "Top": 0, "Right": 9, "Bottom": 5 }
            ]}]
        }"#;
        let err = Grid::from_ocr_json(json, 0).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let json = r#"{
            "Pages": [{ "Width": 10, "Height": 10 }],
            "Rows": [{ "RowNumber": 0, "Cells": [
                { "ColumnIndex": 0, "Left": 0, "Top": 0, "Right": 5, "Bottom": 5 },
                { "ColumnIndex": 0, "Left": 0, "Top": 0, "Right": 5, "Bottom": 5 }
            ]}]
        }"#;
        let err = Grid::from_ocr_json(json, 0).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }
}
