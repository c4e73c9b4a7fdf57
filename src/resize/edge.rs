use crate::error::{GridError, Result};
use crate::layout::CoordinateTransform;
use crate::model::GEOMETRY_EPSILON;
use crate::types::{Axis, Edge, Grid};

/// Move the grid's outer left or right boundary to `new_position_px`.
///
/// The outer edges frame empty padding around the detected columns, so the
/// adjacent column keeps its extent. The edge may meet the nearest column
/// boundary but not cross it.
///
/// # Errors
/// [`GridError::InvalidPosition`] if `new_position_px` is not finite,
/// [`GridError::EdgeCrossesColumn`] if the new position lies inside the
/// columns.
pub fn resize_outer_edge(
    grid: &Grid,
    transform: &CoordinateTransform,
    edge: Edge,
    new_position_px: f64,
) -> Result<Grid> {
    if !new_position_px.is_finite() {
        return Err(GridError::InvalidPosition(new_position_px));
    }
    let position = transform.to_logical(new_position_px, Axis::X);
    let boundary = match edge {
        Edge::Left => grid.columns.first().map_or(grid.left, |c| c.left),
        Edge::Right => grid.columns.last().map_or(grid.right, |c| c.right),
    };

    // Signed distance past the boundary into the columns.
    let overshoot = match edge {
        Edge::Left => position - boundary,
        Edge::Right => boundary - position,
    };
    if overshoot > GEOMETRY_EPSILON {
        return Err(GridError::EdgeCrossesColumn {
            edge,
            position,
            boundary,
        });
    }
    // Landing on the boundary after a pixel round trip snaps exactly onto it.
    let position = if overshoot.abs() <= GEOMETRY_EPSILON {
        boundary
    } else {
        position
    };

    let mut next = grid.clone();
    match edge {
        Edge::Left => next.left = position,
        Edge::Right => next.right = position,
    }

    log::debug!("moved {edge:?} outer edge to {position}");
    Ok(next)
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
    use crate::config::DisplaySize;
    use crate::types::{Column, Page, Rect, Row};

    fn grid() -> Grid {
        let columns = vec![
            Column {
                index: 0,
                left: 20.0,
                right: 60.0,
            },
            Column {
                index: 1,
                left: 60.0,
                right: 80.0,
            },
        ];
        let rows = vec![Row {
            index: 0,
            top: 0.0,
            bottom: 10.0,
            cells: Vec::new(),
        }];
        Grid::new(
            Page {
                width: 100.0,
                height: 100.0,
            },
            Rect::new(10.0, 0.0, 90.0, 10.0),
            columns,
            rows,
        )
        .unwrap()
    }

    // identity scale
    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(
            DisplaySize {
                width: 100.0,
                height: 100.0,
            },
            Page {
                width: 100.0,
                height: 100.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_move_right_edge_outwards() {
        let next = resize_outer_edge(&grid(), &transform(), Edge::Right, 95.0).unwrap();
        assert_eq!(next.bounds().right, 95.0);
        assert_eq!(next.columns()[1].right, 80.0);
    }

    #[test]
    fn test_move_left_edge_onto_column() {
        let next = resize_outer_edge(&grid(), &transform(), Edge::Left, 20.0).unwrap();
        assert_eq!(next.bounds().left, 20.0);
        assert_eq!(next.columns()[0].left, 20.0);
    }

    #[test]
    fn test_right_edge_cannot_cross_last_column() {
        let err = resize_outer_edge(&grid(), &transform(), Edge::Right, 70.0).unwrap_err();
        assert!(matches!(
            err,
            GridError::EdgeCrossesColumn {
                edge: Edge::Right,
                ..
            }
        ));
    }

    #[test]
    fn test_left_edge_cannot_cross_first_column() {
        let err = resize_outer_edge(&grid(), &transform(), Edge::Left, 30.0).unwrap_err();
        assert!(matches!(
            err,
            GridError::EdgeCrossesColumn {
                edge: Edge::Left,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_position() {
        for px in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = resize_outer_edge(&grid(), &transform(), Edge::Right, px).unwrap_err();
            assert!(matches!(err, GridError::InvalidPosition(_)), "{px}: {err}");
        }
    }
}
