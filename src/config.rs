//! Editor configuration.
//!
//! The display size is the fixed pixel size of the reference page image the
//! grid is drawn over. It is owned by the rendering host, not by the grid.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default reference image width in pixels.
pub const DEFAULT_DISPLAY_WIDTH: f64 = 1100.0;

/// Default reference image height in pixels.
pub const DEFAULT_DISPLAY_HEIGHT: f64 = 800.0;

/// Default tolerance (pixels) when checking that measured rows touch.
pub const DEFAULT_ROW_TOLERANCE_PX: f64 = 0.5;

/// Default number of snapshots kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Pixel size of the reference display.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl Default for DisplaySize {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
        }
    }
}

/// Session-wide settings supplied by the host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub display: DisplaySize,
    /// Maximum pixel gap/overlap allowed between consecutive measured rows.
    pub row_tolerance_px: f64,
    /// Maximum number of undo snapshots (oldest are dropped first).
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            display: DisplaySize::default(),
            row_tolerance_px: DEFAULT_ROW_TOLERANCE_PX,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    /// Returns [`GridError::Io`](crate::GridError::Io) if the file cannot be
    /// read, or a JSON error if it is malformed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Same settings with a different display size.
    #[must_use]
    pub fn with_display(mut self, width: f64, height: f64) -> Self {
        self.display = DisplaySize { width, height };
        self
    }
}
