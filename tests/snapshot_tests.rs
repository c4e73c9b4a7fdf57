//! Snapshot import/export tests for ocrgrid
//!
//! Extractor JSON import, native grid JSON round trip, and validation of
//! snapshots entering the crate.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::assert_grid_invariants;
use fixtures::signature_sheet_grid;
use ocrgrid::{
    resize_column, resize_rows, CoordinateTransform, DisplaySize, Grid, GridError, OcrTable,
    RowBounds,
};
use test_case::test_case;

const EXTRACTED: &str = r#"{
    "SignatureSheet": {
        "Pages": [{ "Width": 850, "Height": 1100 }]
    },
    "Rows": [
        { "RowNumber": 1, "Cells": [
            { "ColumnIndex": 0, "Left": 71.8, "Top": 210.0, "Right": 180.2, "Bottom": 236.0, "Text": "Name" },
            { "ColumnIndex": 1, "Left": 180.0, "Top": 210.4, "Right": 395.0, "Bottom": 236.5, "Text": "Address" },
            { "ColumnIndex": 2, "Left": 395.6, "Top": 210.0, "Right": 560.0, "Bottom": 236.2, "Text": "Signature" }
        ]},
        { "RowNumber": 2, "Cells": [
            { "ColumnIndex": 0, "Left": 72.0, "Top": 236.5, "Right": 180.0, "Bottom": 263.0, "Text": "J. Doe" },
            { "ColumnIndex": 2, "Left": 395.5, "Top": 237.0, "Right": 560.5, "Bottom": 262.8 }
        ]},
        { "RowNumber": 3, "Cells": [
            { "ColumnIndex": 1, "Left": 180.1, "Top": 263.0, "Right": 395.5, "Bottom": 289.5 }
        ]}
    ]
}"#;

#[test]
fn test_import_produces_consistent_grid() {
    let grid = Grid::from_ocr_json(EXTRACTED, 0).unwrap();

    assert_eq!(grid.column_count(), 3);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.cells().count(), 6);
    assert_grid_invariants(&grid);

    assert_eq!(grid.columns()[0].left, 71.8);
    assert_eq!(grid.columns()[2].right, 560.5);
    assert_eq!(grid.bounds().top, 210.0);
    assert_eq!(grid.bounds().bottom, 289.5);
    assert!(grid.cell(1, 1).is_none());
    assert_eq!(grid.cell(0, 2).unwrap().content, "Signature");
    assert_eq!(grid.cell(2, 1).unwrap().content, "");
    assert!(grid.cells().all(|c| !c.reviewed));
}

#[test]
fn test_import_orders_rows_by_number() {
    let json = r#"{
        "Pages": [{ "Width": 100, "Height": 100 }],
        "Rows": [
            { "RowNumber": 7, "Cells": [{ "ColumnIndex": 0, "Left": 0, "Top": 50, "Right": 10, "Bottom": 60, "Text": "second" }] },
            { "RowNumber": 3, "Cells": [{ "ColumnIndex": 0, "Left": 0, "Top": 40, "Right": 10, "Bottom": 50, "Text": "first" }] }
        ]
    }"#;
    let grid = Grid::from_ocr_json(json, 0).unwrap();
    assert_eq!(grid.rows()[0].index, 0);
    assert_eq!(grid.cell(0, 0).unwrap().content, "first");
    assert_eq!(grid.cell(1, 0).unwrap().content, "second");
}

#[test]
fn test_import_rejects_repeated_row_number() {
    let json = r#"{
        "Pages": [{ "Width": 100, "Height": 100 }],
        "Rows": [
            { "RowNumber": 1, "Cells": [{ "ColumnIndex": 0, "Left": 0, "Top": 0, "Right": 10, "Bottom": 10 }] },
            { "RowNumber": 1, "Cells": [{ "ColumnIndex": 0, "Left": 0, "Top": 10, "Right": 10, "Bottom": 20 }] }
        ]
    }"#;
    assert!(matches!(
        Grid::from_ocr_json(json, 0),
        Err(GridError::InvalidGrid(_))
    ));
}

#[test]
fn test_import_rejects_empty_row() {
    let json = r#"{
        "Pages": [{ "Width": 100, "Height": 100 }],
        "Rows": [{ "RowNumber": 1, "Cells": [] }]
    }"#;
    assert!(matches!(
        Grid::from_ocr_json(json, 0),
        Err(GridError::InvalidGrid(_))
    ));
}

#[test]
fn test_import_rejects_zero_page_later() {
    let json = r#"{
        "Pages": [{ "Width": 0, "Height": 100 }],
        "Rows": [{ "RowNumber": 1, "Cells": [{ "ColumnIndex": 0, "Left": 0, "Top": 0, "Right": 10, "Bottom": 10 }] }]
    }"#;
    // geometry is fine; the page only fails once a transform is built
    let grid = Grid::from_ocr_json(json, 0).unwrap();
    let err = ocrgrid::ResizeSession::new(grid, ocrgrid::EditorConfig::default()).unwrap_err();
    assert!(matches!(err, GridError::DegeneratePage { .. }));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        OcrTable::from_json("{ not json"),
        Err(GridError::Json(_))
    ));
}

#[test]
fn test_grid_json_round_trip_after_resize() {
    let grid = resize_column(&signature_sheet_grid(), 1, 250.0).unwrap();
    let json = serde_json::to_string(&grid).unwrap();
    let back: Grid = serde_json::from_str(&json).unwrap();
    assert_eq!(back, grid);
}

#[test]
fn test_grid_json_uses_camel_case() {
    let value = serde_json::to_value(signature_sheet_grid()).unwrap();
    let cell = &value["rows"][0]["cells"][0];
    assert_eq!(cell["columnIndex"], 0);
    assert_eq!(cell["rowIndex"], 0);
    assert_eq!(cell["content"], "Name");
    assert_eq!(value["page"]["width"], 850.0);
}

#[test]
fn test_deserialize_rejects_broken_lock_step() {
    let mut value = serde_json::to_value(signature_sheet_grid()).unwrap();
    value["rows"][0]["cells"][0]["right"] = serde_json::json!(999.0);
    assert!(serde_json::from_value::<Grid>(value).is_err());
}

#[test]
fn test_normalize_ocr_export() {
    let json = ocrgrid::normalize_ocr(EXTRACTED, 0).unwrap();
    let grid: Grid = serde_json::from_str(&json).unwrap();
    assert_eq!(grid, Grid::from_ocr_json(EXTRACTED, 0).unwrap());
}

fn grid_json(columns: &[(f64, f64)], rows: &[(f64, f64)]) -> String {
    let columns: Vec<_> = columns
        .iter()
        .enumerate()
        .map(|(index, (left, right))| serde_json::json!({"index": index, "left": left, "right": right}))
        .collect();
    let rows: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(index, (top, bottom))| serde_json::json!({"index": index, "top": top, "bottom": bottom}))
        .collect();
    serde_json::json!({
        "page": {"width": 850, "height": 1100},
        "left": 0, "top": 0, "right": 200, "bottom": 60,
        "columns": columns,
        "rows": rows,
    })
    .to_string()
}

#[test_case(&[(0.0, 50.0), (60.0, 120.0), (120.0, 200.0)] ; "column gap")]
#[test_case(&[(0.0, 50.0), (50.0, 120.0), (110.0, 200.0)] ; "column overlap")]
#[test_case(&[(0.0, 50.0), (60.0, 120.0), (110.0, 200.0)] ; "gap and overlap")]
fn test_deserialize_rejects_non_adjacent_columns(columns: &[(f64, f64)]) {
    let json = grid_json(columns, &[(0.0, 30.0), (30.0, 60.0)]);
    let err = serde_json::from_str::<Grid>(&json).unwrap_err();
    assert!(err.to_string().contains("column"), "{err}");
}

#[test_case(&[(0.0, 30.0), (40.0, 60.0)] ; "row gap")]
#[test_case(&[(0.0, 30.0), (20.0, 60.0)] ; "row overlap")]
fn test_deserialize_rejects_row_seam_beyond_limit(rows: &[(f64, f64)]) {
    let json = grid_json(&[(0.0, 50.0), (50.0, 120.0), (120.0, 200.0)], rows);
    assert!(serde_json::from_str::<Grid>(&json).is_err());
}

#[test]
fn test_deserialize_accepts_sub_unit_row_seam() {
    let json = grid_json(&[(0.0, 50.0), (50.0, 200.0)], &[(0.0, 30.0), (30.4, 60.0)]);
    let grid: Grid = serde_json::from_str(&json).unwrap();
    assert_eq!(grid.rows()[1].top, 30.4);
}

#[test]
fn test_tolerated_row_resize_reloads() {
    let json = grid_json(&[(0.0, 50.0), (50.0, 200.0)], &[(0.0, 30.0), (30.0, 60.0)]);
    let grid: Grid = serde_json::from_str(&json).unwrap();
    let identity = CoordinateTransform::new(
        DisplaySize {
            width: 850.0,
            height: 1100.0,
        },
        grid.page(),
    )
    .unwrap();

    let next = resize_rows(
        &grid,
        &identity,
        &[RowBounds::new(0.0, 30.0), RowBounds::new(29.6, 70.0)],
        0.5,
    )
    .unwrap();
    let back: Grid = serde_json::from_str(&serde_json::to_string(&next).unwrap()).unwrap();
    assert_eq!(back, next);

    // an overlap that would move a short row above its neighbour
    let err = resize_rows(
        &grid,
        &identity,
        &[RowBounds::new(0.2, 0.3), RowBounds::new(0.0, 1.0)],
        0.5,
    )
    .unwrap_err();
    assert!(matches!(err, GridError::NonAdjacentRowBounds { index: 0, .. }));
}
