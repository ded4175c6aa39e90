//! Criterion benchmarks for the full tick loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gantry_bench::warehouse_coordinator;
use gantry_core::Cell;

/// Benchmark: 100 ticks of an idle 32×32 fleet (environment churn only).
fn bench_tick_idle_fleet(c: &mut Criterion) {
    c.bench_function("tick_idle_fleet_100", |b| {
        b.iter(|| {
            let mut coord = warehouse_coordinator(32, 4, 21);
            for _ in 0..100 {
                coord.tick();
            }
            black_box(coord.tick_id());
        });
    });
}

/// Benchmark: 100 ticks with a steady trickle of tasks across the floor.
fn bench_tick_busy_fleet(c: &mut Criterion) {
    c.bench_function("tick_busy_fleet_100", |b| {
        b.iter(|| {
            let mut coord = warehouse_coordinator(32, 4, 21);
            for i in 0..100u64 {
                if i % 10 == 0 {
                    // Row 1 and the last row are never shelved.
                    let col = (i % 30) as i32 + 1;
                    let _ = coord.add_task(Cell::new(1, col), Cell::new(31, col));
                }
                coord.tick();
            }
            black_box(coord.last_metrics());
        });
    });
}

criterion_group!(benches, bench_tick_idle_fleet, bench_tick_busy_fleet);
criterion_main!(benches);
