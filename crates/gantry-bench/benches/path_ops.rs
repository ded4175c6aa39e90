//! Criterion micro-benchmarks for path search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gantry_agent::find_path;
use gantry_bench::cluttered_grid;
use gantry_core::{Cell, CellSet};
use gantry_grid::Grid;

/// Benchmark: corner-to-corner search on an open 64×64 floor.
fn bench_find_path_open_64(c: &mut Criterion) {
    let grid = Grid::new(64, 64).unwrap();
    let blocked = CellSet::new();

    c.bench_function("find_path_open_64", |b| {
        b.iter(|| {
            let route = find_path(&grid, Cell::new(0, 0), Cell::new(63, 63), &blocked);
            black_box(&route);
        });
    });
}

/// Benchmark: corner-to-corner search through 20% clutter.
fn bench_find_path_cluttered_64(c: &mut Criterion) {
    let grid = cluttered_grid(64, 0.2, 9, &[Cell::new(0, 0), Cell::new(63, 63)]);
    let blocked = CellSet::new();

    c.bench_function("find_path_cluttered_64", |b| {
        b.iter(|| {
            let route = find_path(&grid, Cell::new(0, 0), Cell::new(63, 63), &blocked);
            black_box(&route);
        });
    });
}

/// Benchmark: the no-path worst case — goal sealed off, full flood.
fn bench_find_path_unreachable_64(c: &mut Criterion) {
    let mut grid = Grid::new(64, 64).unwrap();
    for cell in [Cell::new(62, 63), Cell::new(63, 62)] {
        grid.add_obstacle(cell);
    }
    let blocked = CellSet::new();

    c.bench_function("find_path_unreachable_64", |b| {
        b.iter(|| {
            let route = find_path(&grid, Cell::new(0, 0), Cell::new(63, 63), &blocked);
            black_box(&route);
        });
    });
}

criterion_group!(
    benches,
    bench_find_path_open_64,
    bench_find_path_cluttered_64,
    bench_find_path_unreachable_64
);
criterion_main!(benches);
