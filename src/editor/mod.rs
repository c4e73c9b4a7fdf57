//! JavaScript-facing editor around [`ResizeSession`].
//!
//! `GridEditor` is the thin stateful shell the browser host drives:
//! - gesture start/commit/cancel with pixel measurements
//! - snapshot and pixel layout read-back for re-rendering and persistence
//! - undo/redo and cell review edits
//!
//! The host owns the image, pointer capture, and drag handles. It asks this
//! editor what to draw and tells it what the user measured.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::error::{GridError, Result};
use crate::resize::RowBounds;
use crate::session::ResizeSession;
use crate::types::{Edge, Grid};

/// The main editor struct exported to JavaScript.
#[wasm_bindgen]
pub struct GridEditor {
    session: ResizeSession,
}

#[wasm_bindgen]
impl GridEditor {
    /// Create an editor from a grid snapshot in this crate's JSON shape.
    ///
    /// `config_json` may be omitted or partial; missing settings take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(grid_json: &str, config_json: Option<String>) -> std::result::Result<GridEditor, JsValue> {
        console_error_panic_hook::set_once();
        Ok(Self::from_grid_json(grid_json, config_json.as_deref())?)
    }

    /// Create an editor directly from table extraction output.
    #[wasm_bindgen(js_name = "fromOcr")]
    pub fn from_ocr(
        ocr_json: &str,
        page_index: usize,
        config_json: Option<String>,
    ) -> std::result::Result<GridEditor, JsValue> {
        console_error_panic_hook::set_once();
        Ok(Self::from_ocr_json(ocr_json, page_index, config_json.as_deref())?)
    }

    /// Current grid in logical units.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.session.grid())
    }

    /// Current grid as JSON, ready for persistence.
    #[wasm_bindgen(js_name = "snapshotJson")]
    pub fn snapshot_json(&self) -> std::result::Result<String, JsValue> {
        Ok(serde_json::to_string(self.session.grid()).map_err(GridError::from)?)
    }

    /// Current grid in display pixels, with axis visibility flags.
    #[wasm_bindgen]
    pub fn layout(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.session.display_layout())
    }

    /// Horizontal and vertical scale factors.
    #[wasm_bindgen]
    pub fn scales(&self) -> Vec<f64> {
        let t = self.session.transform();
        vec![t.scale_x(), t.scale_y()]
    }

    #[wasm_bindgen(js_name = "beginColumnResize")]
    pub fn begin_column_resize(&mut self, index: usize) -> std::result::Result<(), JsValue> {
        Ok(self.session.begin_column_resize(index)?)
    }

    /// Commit the dragged column's rendered width in pixels.
    #[wasm_bindgen(js_name = "commitColumnResize")]
    pub fn commit_column_resize(&mut self, width_px: f64) -> std::result::Result<(), JsValue> {
        self.session.commit_column_resize(width_px)?;
        Ok(())
    }

    /// `edge` is `"left"` or `"right"`.
    #[wasm_bindgen(js_name = "beginEdgeResize")]
    pub fn begin_edge_resize(&mut self, edge: &str) -> std::result::Result<(), JsValue> {
        let edge: Edge = edge.parse().map_err(|e: String| JsValue::from_str(&e))?;
        Ok(self.session.begin_edge_resize(edge)?)
    }

    #[wasm_bindgen(js_name = "commitEdgeResize")]
    pub fn commit_edge_resize(&mut self, position_px: f64) -> std::result::Result<(), JsValue> {
        self.session.commit_edge_resize(position_px)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "beginRowResize")]
    pub fn begin_row_resize(&mut self) -> std::result::Result<(), JsValue> {
        Ok(self.session.begin_row_resize()?)
    }

    /// Commit re-measured rows as flat `[top0, bottom0, top1, bottom1, ...]` pixels.
    #[wasm_bindgen(js_name = "commitRowResize")]
    pub fn commit_row_resize(&mut self, bounds: &[f64]) -> std::result::Result<(), JsValue> {
        let measured = row_bounds_from_pairs(bounds, self.session.grid().row_count())?;
        self.session.commit_row_resize(&measured)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "cancelResize")]
    pub fn cancel_resize(&mut self) {
        self.session.cancel_resize();
    }

    #[wasm_bindgen(js_name = "isResizing")]
    pub fn is_resizing(&self) -> bool {
        !self.session.is_idle()
    }

    #[wasm_bindgen(js_name = "rowsVisible")]
    pub fn rows_visible(&self) -> bool {
        self.session.visibility().rows
    }

    #[wasm_bindgen(js_name = "columnsVisible")]
    pub fn columns_visible(&self) -> bool {
        self.session.visibility().columns
    }

    /// Hit-test: which column is under the given pixel x?
    #[wasm_bindgen(js_name = "columnAtX")]
    pub fn column_at_x(&self, x: f64) -> Option<usize> {
        self.session.display_layout().column_at_x(x)
    }

    /// Hit-test: which row is under the given pixel y?
    #[wasm_bindgen(js_name = "rowAtY")]
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        self.session.display_layout().row_at_y(y)
    }

    #[wasm_bindgen]
    pub fn undo(&mut self) -> std::result::Result<(), JsValue> {
        self.session.undo()?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn redo(&mut self) -> std::result::Result<(), JsValue> {
        self.session.redo()?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "canUndo")]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = "canRedo")]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    #[wasm_bindgen(js_name = "setCellContent")]
    pub fn set_cell_content(
        &mut self,
        row: usize,
        column: usize,
        content: &str,
    ) -> std::result::Result<(), JsValue> {
        self.session.set_cell_content(row, column, content)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "setCellReviewed")]
    pub fn set_cell_reviewed(
        &mut self,
        row: usize,
        column: usize,
        reviewed: bool,
    ) -> std::result::Result<(), JsValue> {
        self.session.set_cell_reviewed(row, column, reviewed)?;
        Ok(())
    }
}

impl GridEditor {
    /// Build an editor from native grid JSON and an optional config.
    ///
    /// # Errors
    /// Malformed JSON, an invalid grid, or a degenerate page/display.
    pub fn from_grid_json(grid_json: &str, config_json: Option<&str>) -> Result<Self> {
        let grid: Grid = serde_json::from_str(grid_json)?;
        Self::with_grid(grid, config_json)
    }

    /// Build an editor from extractor JSON and an optional config.
    ///
    /// # Errors
    /// Malformed JSON, a table that cannot be imported, or a degenerate page/display.
    pub fn from_ocr_json(ocr_json: &str, page_index: usize, config_json: Option<&str>) -> Result<Self> {
        let grid = Grid::from_ocr_json(ocr_json, page_index)?;
        Self::with_grid(grid, config_json)
    }

    fn with_grid(grid: Grid, config_json: Option<&str>) -> Result<Self> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        Ok(Self {
            session: ResizeSession::new(grid, config)?,
        })
    }

    pub fn session(&self) -> &ResizeSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ResizeSession {
        &mut self.session
    }
}

/// Split flat `[top, bottom, ...]` pixel values into one bound per row.
pub(crate) fn row_bounds_from_pairs(values: &[f64], rows: usize) -> Result<Vec<RowBounds>> {
    if values.len() != rows * 2 {
        return Err(GridError::RowCountMismatch {
            expected: rows,
            actual: values.len() / 2,
        });
    }
    Ok(values
        .chunks_exact(2)
        .filter_map(|pair| match pair {
            [top, bottom] => Some(RowBounds::new(*top, *bottom)),
            _ => None,
        })
        .collect())
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
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

    const GRID: &str = r#"{
        "page": {"width": 850, "height": 1100},
        "left": 100, "top": 100, "right": 300, "bottom": 200,
        "columns": [
            {"index": 0, "left": 100, "right": 200},
            {"index": 1, "left": 200, "right": 300}
        ],
        "rows": [{"index": 0, "top": 100, "bottom": 200, "cells": []}]
    }"#;

    #[test]
    fn test_row_pairs() {
        let bounds = row_bounds_from_pairs(&[0.0, 10.0, 10.0, 25.0], 2).unwrap();
        assert_eq!(bounds, vec![RowBounds::new(0.0, 10.0), RowBounds::new(10.0, 25.0)]);
    }

    #[test]
    fn test_row_pairs_odd_length() {
        assert!(matches!(
            row_bounds_from_pairs(&[0.0, 10.0, 10.0], 2),
            Err(GridError::RowCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_from_grid_json_with_config() {
        let editor =
            GridEditor::from_grid_json(GRID, Some(r#"{"display": {"width": 850, "height": 1100}}"#))
                .unwrap();
        assert_eq!(editor.session().transform().scale_x(), 1.0);
        assert_eq!(editor.session().grid().column_count(), 2);
    }

    #[test]
    fn test_from_grid_json_default_display() {
        let editor = GridEditor::from_grid_json(GRID, None).unwrap();
        assert!((editor.session().transform().scale_x() - 1100.0 / 850.0).abs() < 1e-12);
    }

    #[test]
    fn test_session_mut_drives_resize() {
        let mut editor =
            GridEditor::from_grid_json(GRID, Some(r#"{"display": {"width": 850, "height": 1100}}"#))
                .unwrap();
        let session = editor.session_mut();
        session.begin_column_resize(0).unwrap();
        session.commit_column_resize(150.0).unwrap();
        assert_eq!(editor.session().grid().bounds().right, 350.0);
    }
}
