//! Structured error types for ocrgrid.
//!
//! Every geometry operation either returns a new, fully consistent grid or one
//! of these errors; the caller's previous snapshot is never touched.

use crate::types::Edge;

/// All errors that can occur while building, transforming, or resizing a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The page has a zero (or otherwise unusable) width or height.
    #[error("Degenerate page: {width}x{height}")]
    DegeneratePage { width: f64, height: f64 },

    /// The reference display has a zero (or otherwise unusable) size.
    #[error("Degenerate display: {width}x{height}")]
    DegenerateDisplay { width: f64, height: f64 },

    /// Snapshot failed index, ordering, adjacency, or cell-reference validation.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Column index outside `0..len`.
    #[error("Column {index} out of range (grid has {len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    /// Row index outside `0..len`.
    #[error("Row {index} out of range (grid has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// No cell exists at the given row/column.
    #[error("No cell at row {row}, column {column}")]
    CellNotFound { row: usize, column: usize },

    /// Requested column width is not a positive finite number.
    #[error("Invalid column width: {0}")]
    InvalidWidth(f64),

    /// Requested outer edge position is not a finite number.
    #[error("Invalid edge position: {0}")]
    InvalidPosition(f64),

    /// Row measurements do not cover every row exactly once.
    #[error("Row count mismatch: grid has {expected} rows, got {actual} measurements")]
    RowCountMismatch { expected: usize, actual: usize },

    /// Measured row `index` does not end where row `index + 1` starts.
    #[error("Row {index} bottom and row {} top differ by {gap}px", .index + 1)]
    NonAdjacentRowBounds { index: usize, gap: f64 },

    /// Measured row has its bottom above its top.
    #[error("Row {index} measured with bottom above top")]
    InvertedRowBounds { index: usize },

    /// Outer edge would move past the nearest column boundary.
    #[error("{edge:?} edge at {position} crosses column boundary at {boundary}")]
    EdgeCrossesColumn {
        edge: Edge,
        position: f64,
        boundary: f64,
    },

    /// A resize was requested while another gesture is in flight.
    #[error("Concurrent resize not supported: {active} resize in progress")]
    ConcurrentResizeNotSupported { active: String },

    /// A commit was requested without a matching gesture.
    #[error("No matching resize in progress")]
    NoResizeInProgress,

    /// Undo history is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo history is empty.
    #[error("Nothing to redo")]
    NothingToRedo,

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
