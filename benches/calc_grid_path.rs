//! Measure the grid A* solver crossing a 100x100 world littered with walls
//!

use bevy_tycoon_pathing_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build the grid and a mask with a staggered series of wall slabs
fn prepare_world() -> (GridDimensions, OccupancyMask) {
	let grid = GridDimensions::new(100, 100);
	let mut walls = Walls::default();
	for i in 0..9 {
		let x = 10 + i * 10;
		let y = if i % 2 == 0 { 0 } else { 20 };
		walls.add(WallRect::new(x, y, 2, 78));
	}
	let mut mask = OccupancyMask::new(&grid);
	mask.rebuild(&grid, &walls);
	(grid, mask)
}

/// Solve corner to corner under a generous iteration cap
fn calc(grid: &GridDimensions, mask: &OccupancyMask) -> GridPath {
	shortest_path(
		grid,
		mask,
		GridCoord::new(0, 0),
		GridCoord::new(99, 99),
		1_000_000,
	)
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let (grid, mask) = prepare_world();
	group.bench_function("calc_grid_path", |b| {
		b.iter(|| calc(black_box(&grid), black_box(&mask)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
