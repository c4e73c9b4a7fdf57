//! ocrgrid - table grid geometry for correcting OCR output
//!
//! Models the rows, columns, and cells a table extractor detected on a
//! scanned page, and keeps them consistent while a user corrects them over a
//! fixed-size image of that page:
//! - Logical (document) ↔ display (pixel) coordinate transform
//! - Column, row, and outer-edge resize with full propagation to cells
//! - Gesture state machine with per-axis visibility, undo/redo
//! - Import of extractor JSON, export of corrected grid JSON
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridEditor } from 'ocrgrid';
//! await init();
//! const editor = GridEditor.fromOcr(ocrJson, 0);
//! editor.beginColumnResize(2);
//! editor.commitColumnResize(180);
//! draw(editor.layout());
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod model;
pub mod resize;
pub mod session;
pub mod snapshot;
pub mod types;

use wasm_bindgen::prelude::*;

pub use config::{DisplaySize, EditorConfig};
pub use editor::GridEditor;
pub use error::{GridError, Result};
pub use layout::{CoordinateTransform, DisplayLayout};
pub use resize::{resize_column, resize_column_px, resize_outer_edge, resize_rows, RowBounds};
pub use session::{AxisState, ResizeSession, ResizeTarget};
pub use snapshot::OcrTable;

pub use types::*;

/// Import extractor JSON and return the normalized grid as a JSON string
///
/// # Arguments
/// * `json` - Extractor output (PascalCase table JSON)
/// * `page_index` - Page whose size defines the logical coordinate space
///
/// # Errors
/// Returns an error if the JSON is malformed or the table is inconsistent.
#[wasm_bindgen(js_name = "normalizeOcr")]
pub fn normalize_ocr(json: &str, page_index: usize) -> std::result::Result<String, JsValue> {
    let grid = Grid::from_ocr_json(json, page_index)?;

    serde_json::to_string(&grid)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
