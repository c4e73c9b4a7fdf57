//! Benchmarks for resize propagation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ocrgrid::{
    resize_column, resize_outer_edge, resize_rows, Cell, Column, CoordinateTransform,
    DisplayLayout, DisplaySize, Edge, Grid, Page, Rect, Row, RowBounds,
};
use ocrgrid::layout::Visibility;

const COLUMNS: usize = 8;
const COLUMN_WIDTH: f64 = 100.0;
const ROW_HEIGHT: f64 = 1.0;

fn page() -> Page {
    Page {
        width: 850.0,
        height: 1100.0,
    }
}

/// Fully populated grid with `rows` rows and 8 columns.
fn grid(rows: usize) -> Grid {
    let columns: Vec<Column> = (0..COLUMNS)
        .map(|index| Column {
            index,
            left: index as f64 * COLUMN_WIDTH,
            right: (index + 1) as f64 * COLUMN_WIDTH,
        })
        .collect();
    let rows: Vec<Row> = (0..rows)
        .map(|index| {
            let top = index as f64 * ROW_HEIGHT;
            let bottom = top + ROW_HEIGHT;
            Row {
                index,
                top,
                bottom,
                cells: columns
                    .iter()
                    .map(|c| Cell {
                        column_index: c.index,
                        row_index: index,
                        left: c.left,
                        top,
                        right: c.right,
                        bottom,
                        content: format!("r{index}c{}", c.index),
                        reviewed: false,
                    })
                    .collect(),
            }
        })
        .collect();
    let bottom = rows.len() as f64 * ROW_HEIGHT;
    Grid::new(
        page(),
        Rect::new(0.0, 0.0, COLUMNS as f64 * COLUMN_WIDTH, bottom),
        columns,
        rows,
    )
    .expect("benchmark grid is valid")
}

fn identity() -> CoordinateTransform {
    CoordinateTransform::new(
        DisplaySize {
            width: 850.0,
            height: 1100.0,
        },
        page(),
    )
    .expect("non-degenerate transform")
}

/// Widening the first column shifts every other column and cell.
fn bench_column_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_resize");

    for rows in [10, 100, 1000] {
        let g = grid(rows);
        group.throughput(Throughput::Elements((rows * COLUMNS) as u64));
        group.bench_with_input(BenchmarkId::new("first_column", rows), &g, |b, g| {
            b.iter(|| resize_column(black_box(g), 0, 90.0).expect("resize failed"))
        });
    }

    group.finish();
}

fn bench_row_resize(c: &mut Criterion) {
    let transform = identity();
    let mut group = c.benchmark_group("row_resize");

    for rows in [10, 100, 1000] {
        let g = grid(rows);
        let measured: Vec<RowBounds> = g
            .rows()
            .iter()
            .map(|r| RowBounds::new(r.top + 0.25, r.bottom + 0.25))
            .collect();
        group.throughput(Throughput::Elements((rows * COLUMNS) as u64));
        group.bench_with_input(BenchmarkId::new("all_rows", rows), &g, |b, g| {
            b.iter(|| {
                resize_rows(black_box(g), &transform, black_box(&measured), 0.5)
                    .expect("resize failed")
            })
        });
    }

    group.finish();
}

fn bench_edge_resize(c: &mut Criterion) {
    let transform = identity();
    let g = grid(100);

    c.bench_function("right_edge", |b| {
        b.iter(|| {
            resize_outer_edge(black_box(&g), &transform, Edge::Right, 840.0).expect("resize failed")
        })
    });
}

/// Pixel layout is recomputed after every commit.
fn bench_display_layout(c: &mut Criterion) {
    let transform = CoordinateTransform::new(
        DisplaySize {
            width: 1100.0,
            height: 800.0,
        },
        page(),
    )
    .expect("non-degenerate transform");
    let g = grid(1000);

    c.bench_function("display_layout_1000x8", |b| {
        b.iter(|| DisplayLayout::compute(black_box(&g), &transform, Visibility::default()))
    });
}

criterion_group!(
    benches,
    bench_column_resize,
    bench_row_resize,
    bench_edge_resize,
    bench_display_layout,
);

criterion_main!(benches);
