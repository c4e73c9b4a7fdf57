//! Editing session: resize gestures, visibility, and snapshot history.
//!
//! The session owns the current grid and decides *when* a pure resize
//! operation runs. At most one gesture is in flight at a time. While a
//! horizontal gesture (column or outer edge) is active rows are hidden, and
//! while rows are being resized columns are hidden.

use std::collections::VecDeque;
use std::fmt;

use crate::config::EditorConfig;
use crate::error::{GridError, Result};
use crate::layout::{CoordinateTransform, DisplayLayout, Visibility};
use crate::resize::{resize_column_px, resize_outer_edge, resize_rows, RowBounds};
use crate::types::{Cell, Edge, Grid};

/// What an in-flight gesture is resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    Column(usize),
    Edge(Edge),
    Rows,
}

impl fmt::Display for ResizeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeTarget::Column(i) => write!(f, "column {i}"),
            ResizeTarget::Edge(Edge::Left) => f.write_str("left edge"),
            ResizeTarget::Edge(Edge::Right) => f.write_str("right edge"),
            ResizeTarget::Rows => f.write_str("row"),
        }
    }
}

/// Per-axis gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisState {
    #[default]
    Idle,
    Resizing(ResizeTarget),
}

/// A stateful editing shell around an immutable grid snapshot.
#[derive(Debug)]
pub struct ResizeSession {
    grid: Grid,
    transform: CoordinateTransform,
    config: EditorConfig,
    horizontal: AxisState,
    vertical: AxisState,
    visibility: Visibility,
    undo_stack: VecDeque<Grid>,
    redo_stack: Vec<Grid>,
}

impl ResizeSession {
    /// Start a session on `grid`.
    ///
    /// # Errors
    /// Fails if the grid's page or the configured display size is degenerate.
    pub fn new(grid: Grid, config: EditorConfig) -> Result<Self> {
        let transform = CoordinateTransform::new(config.display, grid.page())?;
        Ok(Self {
            grid,
            transform,
            config,
            horizontal: AxisState::Idle,
            vertical: AxisState::Idle,
            visibility: Visibility::default(),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Gesture state of the column/edge axis.
    pub fn horizontal_state(&self) -> AxisState {
        self.horizontal
    }

    /// Gesture state of the row axis.
    pub fn vertical_state(&self) -> AxisState {
        self.vertical
    }

    pub fn is_idle(&self) -> bool {
        self.active_target().is_none()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Current grid in display pixels, honoring gesture visibility.
    pub fn display_layout(&self) -> DisplayLayout {
        DisplayLayout::compute(&self.grid, &self.transform, self.visibility)
    }

    /// Replace the grid with a fresh snapshot, dropping history.
    ///
    /// # Errors
    /// Fails if a gesture is in flight or the new page is degenerate.
    pub fn load(&mut self, grid: Grid) -> Result<()> {
        self.ensure_idle()?;
        self.transform = CoordinateTransform::new(self.config.display, grid.page())?;
        self.grid = grid;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Start dragging column `index`. Rows are hidden until the gesture ends.
    ///
    /// # Errors
    /// [`GridError::ConcurrentResizeNotSupported`] if any gesture is active,
    /// [`GridError::ColumnOutOfRange`] for a bad index.
    pub fn begin_column_resize(&mut self, index: usize) -> Result<()> {
        self.ensure_idle()?;
        if index >= self.grid.column_count() {
            return Err(GridError::ColumnOutOfRange {
                index,
                len: self.grid.column_count(),
            });
        }
        self.horizontal = AxisState::Resizing(ResizeTarget::Column(index));
        self.visibility.rows = false;
        Ok(())
    }

    /// Start dragging an outer edge. Rows are hidden until the gesture ends.
    ///
    /// # Errors
    /// [`GridError::ConcurrentResizeNotSupported`] if any gesture is active.
    pub fn begin_edge_resize(&mut self, edge: Edge) -> Result<()> {
        self.ensure_idle()?;
        self.horizontal = AxisState::Resizing(ResizeTarget::Edge(edge));
        self.visibility.rows = false;
        Ok(())
    }

    /// Start dragging a row divider. Columns are hidden until the gesture ends.
    ///
    /// # Errors
    /// [`GridError::ConcurrentResizeNotSupported`] if any gesture is active.
    pub fn begin_row_resize(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.vertical = AxisState::Resizing(ResizeTarget::Rows);
        self.visibility.columns = false;
        Ok(())
    }

    /// Finish a column drag with the column's rendered width in pixels.
    ///
    /// On error the gesture stays active and the grid is unchanged, so the
    /// host may retry with a corrected measurement or cancel.
    ///
    /// # Errors
    /// [`GridError::NoResizeInProgress`] without an active column gesture,
    /// otherwise any error from [`resize_column_px`].
    pub fn commit_column_resize(&mut self, new_width_px: f64) -> Result<&Grid> {
        let AxisState::Resizing(ResizeTarget::Column(index)) = self.horizontal else {
            return Err(GridError::NoResizeInProgress);
        };
        let next = resize_column_px(&self.grid, &self.transform, index, new_width_px)
            .inspect_err(|e| log::warn!("column {index} resize rejected: {e}"))?;
        self.commit(next);
        Ok(&self.grid)
    }

    /// Finish an outer edge drag with the edge's new pixel position.
    ///
    /// # Errors
    /// [`GridError::NoResizeInProgress`] without an active edge gesture,
    /// otherwise any error from [`resize_outer_edge`].
    pub fn commit_edge_resize(&mut self, new_position_px: f64) -> Result<&Grid> {
        let AxisState::Resizing(ResizeTarget::Edge(edge)) = self.horizontal else {
            return Err(GridError::NoResizeInProgress);
        };
        let next = resize_outer_edge(&self.grid, &self.transform, edge, new_position_px)
            .inspect_err(|e| log::warn!("{edge:?} edge resize rejected: {e}"))?;
        self.commit(next);
        Ok(&self.grid)
    }

    /// Finish a row drag with the host's re-measured row bounds.
    ///
    /// # Errors
    /// [`GridError::NoResizeInProgress`] without an active row gesture,
    /// otherwise any error from [`resize_rows`].
    pub fn commit_row_resize(&mut self, measured: &[RowBounds]) -> Result<&Grid> {
        if self.vertical != AxisState::Resizing(ResizeTarget::Rows) {
            return Err(GridError::NoResizeInProgress);
        }
        let next = resize_rows(
            &self.grid,
            &self.transform,
            measured,
            self.config.row_tolerance_px,
        )
        .inspect_err(|e| log::warn!("row resize rejected: {e}"))?;
        self.commit(next);
        Ok(&self.grid)
    }

    /// Abandon the active gesture (if any) without touching the grid.
    pub fn cancel_resize(&mut self) {
        if let Some(target) = self.active_target() {
            log::debug!("cancelled {target} resize");
        }
        self.end_gesture();
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Restore the previous snapshot.
    ///
    /// # Errors
    /// [`GridError::ConcurrentResizeNotSupported`] during a gesture,
    /// [`GridError::NothingToUndo`] with empty history.
    pub fn undo(&mut self) -> Result<&Grid> {
        self.ensure_idle()?;
        let prev = self.undo_stack.pop_back().ok_or(GridError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.grid, prev);
        self.redo_stack.push(current);
        Ok(&self.grid)
    }

    /// Re-apply the most recently undone snapshot.
    ///
    /// # Errors
    /// [`GridError::ConcurrentResizeNotSupported`] during a gesture,
    /// [`GridError::NothingToRedo`] if nothing was undone.
    pub fn redo(&mut self) -> Result<&Grid> {
        self.ensure_idle()?;
        let next = self.redo_stack.pop().ok_or(GridError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.grid, next);
        self.push_undo(current);
        Ok(&self.grid)
    }

    // ------------------------------------------------------------------
    // Cell review
    // ------------------------------------------------------------------

    /// Replace the recognized text of a cell.
    ///
    /// # Errors
    /// [`GridError::ConcurrentResizeNotSupported`] during a gesture,
    /// [`GridError::RowOutOfRange`] for a bad row, [`GridError::CellNotFound`]
    /// if the row has no cell in `column`.
    pub fn set_cell_content(&mut self, row: usize, column: usize, content: &str) -> Result<&Grid> {
        self.edit_cell(row, column, |cell| cell.content = content.to_string())
    }

    /// Mark a cell as reviewed (or not).
    ///
    /// # Errors
    /// Same as [`ResizeSession::set_cell_content`].
    pub fn set_cell_reviewed(&mut self, row: usize, column: usize, reviewed: bool) -> Result<&Grid> {
        self.edit_cell(row, column, |cell| cell.reviewed = reviewed)
    }

    fn edit_cell(&mut self, row: usize, column: usize, edit: impl FnOnce(&mut Cell)) -> Result<&Grid> {
        self.ensure_idle()?;
        let mut next = self.grid.clone();
        let len = next.rows.len();
        let cell = next
            .rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange { index: row, len })?
            .cells
            .iter_mut()
            .find(|c| c.column_index == column)
            .ok_or(GridError::CellNotFound { row, column })?;
        edit(cell);
        self.commit(next);
        Ok(&self.grid)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn active_target(&self) -> Option<ResizeTarget> {
        match (self.horizontal, self.vertical) {
            (AxisState::Resizing(t), _) | (_, AxisState::Resizing(t)) => Some(t),
            (AxisState::Idle, AxisState::Idle) => None,
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.active_target() {
            Some(active) => {
                log::warn!("rejected operation while {active} resize is in progress");
                Err(GridError::ConcurrentResizeNotSupported {
                    active: active.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    fn commit(&mut self, next: Grid) {
        let prev = std::mem::replace(&mut self.grid, next);
        self.push_undo(prev);
        self.redo_stack.clear();
        self.end_gesture();
    }

    fn push_undo(&mut self, grid: Grid) {
        if self.config.history_limit == 0 {
            return;
        }
        while self.undo_stack.len() >= self.config.history_limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(grid);
    }

    fn end_gesture(&mut self) {
        self.horizontal = AxisState::Idle;
        self.vertical = AxisState::Idle;
        self.visibility = Visibility::default();
    }
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
    use crate::types::{Column, Page, Rect, Row};

    fn session() -> ResizeSession {
        let columns = vec![
            Column {
                index: 0,
                left: 0.0,
                right: 50.0,
            },
            Column {
                index: 1,
                left: 50.0,
                right: 100.0,
            },
        ];
        let rows = vec![
            Row {
                index: 0,
                top: 0.0,
                bottom: 50.0,
                cells: vec![Cell {
                    column_index: 0,
                    row_index: 0,
                    left: 0.0,
                    top: 0.0,
                    right: 50.0,
                    bottom: 50.0,
                    content: "a".into(),
                    reviewed: false,
                }],
            },
            Row {
                index: 1,
                top: 50.0,
                bottom: 100.0,
                cells: Vec::new(),
            },
        ];
        let grid = Grid::new(
            Page {
                width: 100.0,
                height: 100.0,
            },
            Rect::new(0.0, 0.0, 100.0, 100.0),
            columns,
            rows,
        )
        .unwrap();
        let config = EditorConfig::default().with_display(100.0, 100.0);
        ResizeSession::new(grid, config).unwrap()
    }

    #[test]
    fn test_column_gesture_hides_rows() {
        let mut s = session();
        s.begin_column_resize(0).unwrap();
        assert!(!s.visibility().rows);
        assert!(s.visibility().columns);
        assert_eq!(
            s.horizontal_state(),
            AxisState::Resizing(ResizeTarget::Column(0))
        );

        s.commit_column_resize(60.0).unwrap();
        assert!(s.is_idle());
        assert_eq!(s.visibility(), Visibility::default());
        assert_eq!(s.grid().columns()[1].right, 110.0);
    }

    #[test]
    fn test_row_gesture_blocks_column_gesture() {
        let mut s = session();
        s.begin_row_resize().unwrap();
        assert!(!s.visibility().columns);
        let err = s.begin_column_resize(0).unwrap_err();
        assert!(matches!(err, GridError::ConcurrentResizeNotSupported { .. }));
        assert_eq!(s.vertical_state(), AxisState::Resizing(ResizeTarget::Rows));
    }

    #[test]
    fn test_commit_without_gesture() {
        let mut s = session();
        assert!(matches!(
            s.commit_column_resize(10.0),
            Err(GridError::NoResizeInProgress)
        ));
        s.begin_edge_resize(Edge::Right).unwrap();
        assert!(matches!(
            s.commit_column_resize(10.0),
            Err(GridError::NoResizeInProgress)
        ));
    }

    #[test]
    fn test_failed_commit_keeps_gesture() {
        let mut s = session();
        s.begin_edge_resize(Edge::Right).unwrap();
        let before = s.grid().clone();
        assert!(s.commit_edge_resize(40.0).is_err());
        assert_eq!(s.grid(), &before);
        assert!(!s.is_idle());
        s.cancel_resize();
        assert!(s.is_idle());
        assert!(!s.can_undo());
    }

    #[test]
    fn test_undo_redo() {
        let mut s = session();
        let original = s.grid().clone();
        s.begin_column_resize(1).unwrap();
        s.commit_column_resize(80.0).unwrap();
        let resized = s.grid().clone();

        assert_eq!(s.undo().unwrap(), &original);
        assert_eq!(s.redo().unwrap(), &resized);
        assert!(matches!(s.redo(), Err(GridError::NothingToRedo)));
    }

    #[test]
    fn test_history_limit() {
        let mut s = session();
        s.config.history_limit = 1;
        s.set_cell_content(0, 0, "b").unwrap();
        s.set_cell_content(0, 0, "c").unwrap();
        s.undo().unwrap();
        assert_eq!(s.grid().cell(0, 0).unwrap().content, "b");
        assert!(matches!(s.undo(), Err(GridError::NothingToUndo)));
    }

    #[test]
    fn test_cell_edits() {
        let mut s = session();
        s.set_cell_reviewed(0, 0, true).unwrap();
        assert!(s.grid().cell(0, 0).unwrap().reviewed);
        assert!(matches!(
            s.set_cell_content(1, 0, "x"),
            Err(GridError::CellNotFound { row: 1, column: 0 })
        ));
        assert!(matches!(
            s.set_cell_reviewed(5, 0, true),
            Err(GridError::RowOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_display_layout_reflects_visibility() {
        let mut s = session();
        s.begin_row_resize().unwrap();
        let layout = s.display_layout();
        assert!(!layout.visibility.columns);
        assert!(layout.visibility.rows);
    }

    #[test]
    fn test_load_rejects_degenerate_page() {
        let mut s = session();
        let mut g = s.grid().clone();
        g.page = Page {
            width: 0.0,
            height: 100.0,
        };
        assert!(matches!(s.load(g), Err(GridError::DegeneratePage { .. })));
    }
}
