//! Browser tests for the JavaScript-facing editor.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use ocrgrid::GridEditor;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const GRID: &str = r#"{
    "page": {"width": 850, "height": 1100},
    "left": 0, "top": 0, "right": 200, "bottom": 60,
    "columns": [
        {"index": 0, "left": 0, "right": 50},
        {"index": 1, "left": 50, "right": 120},
        {"index": 2, "left": 120, "right": 200}
    ],
    "rows": [
        {"index": 0, "top": 0, "bottom": 30},
        {"index": 1, "top": 30, "bottom": 60}
    ]
}"#;

const IDENTITY: &str = r#"{"display": {"width": 850, "height": 1100}}"#;

#[wasm_bindgen_test]
fn column_gesture_round_trip() {
    let mut editor = GridEditor::new(GRID, Some(IDENTITY.to_string())).unwrap();
    editor.begin_column_resize(1).unwrap();
    assert!(!editor.rows_visible());
    editor.commit_column_resize(90.0).unwrap();
    assert!(editor.rows_visible());

    let json = editor.snapshot_json().unwrap();
    assert!(json.contains("\"right\":220"));
}

#[wasm_bindgen_test]
fn row_gesture_rejects_gap() {
    let mut editor = GridEditor::new(GRID, Some(IDENTITY.to_string())).unwrap();
    editor.begin_row_resize().unwrap();
    assert!(editor.commit_row_resize(&[0.0, 30.0, 40.0, 60.0]).is_err());
    assert!(editor.is_resizing());
    editor.cancel_resize();
    assert!(!editor.is_resizing());
}

#[wasm_bindgen_test]
fn concurrent_gesture_rejected() {
    let mut editor = GridEditor::new(GRID, None).unwrap();
    editor.begin_edge_resize("right").unwrap();
    assert!(editor.begin_row_resize().is_err());
}
