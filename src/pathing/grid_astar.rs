//! A single-shot shortest-path solver working directly over the grid and its
//! occupancy mask. Movement is 8-directional with orthogonal steps weighted
//! `10` and diagonal steps `14` (Euclidean cost x10) guided by an
//! octile-distance heuristic.
//!
//! The working set is a handful of flat arrays sized to the whole grid plus a
//! linearly-scanned open list - no priority queue. That is deliberate: the
//! solver runs over one map region at a time where open lists stay small.
//!
//! An iteration cap bounds the work done by a single call. When the cap is
//! hit the solver falls back to the open cell with the lowest heuristic to
//! the end (note: a different metric than the `g + h` score driving the
//! search) and reconstructs a best-effort partial path from there.
//!
//! Reconstructed paths are simplified online: consecutive exactly-collinear
//! points are merged into single segments up to a run length of
//! [SEG_MAX_LENGTH], shrinking the point count of long straight corridors
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Offsets of the 8 neighbouring cells, orthogonals first
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
	(1, 0),
	(-1, 0),
	(0, 1),
	(0, -1),
	(1, 1),
	(-1, 1),
	(1, -1),
	(-1, -1),
];
/// Step weights aligned with [NEIGHBOUR_OFFSETS]
const NEIGHBOUR_WEIGHTS: [i32; 8] = [10, 10, 10, 10, 14, 14, 14, 14];
/// Longest run of collinear points merged into a single path segment
const SEG_MAX_LENGTH: i32 = 10;
/// Hard bound on path reconstruction, guards against a corrupt parent chain
const RECONSTRUCT_WATCHDOG: i32 = 100_000;

/// An ordered sequence of grid coordinates from start to end produced by
/// [shortest_path], plus the cells still open when the search terminated
/// (exposed for debug overlays only, gameplay logic must not read them)
#[derive(Clone, Debug, Default)]
pub struct GridPath {
	/// Waypoints in start to end order, collinear runs merged
	points: Vec<GridCoord>,
	/// Cost `g` of the terminal cell of the search
	cost: i32,
	/// Every cell left on the open list at termination
	debug_open: Vec<GridCoord>,
}

impl GridPath {
	/// Get the waypoints in start to end order
	pub fn get_points(&self) -> &Vec<GridCoord> {
		&self.points
	}
	/// Get the accumulated cost of the path
	pub fn get_cost(&self) -> i32 {
		self.cost
	}
	/// Get the cells that remained open at search termination
	pub fn get_debug_open(&self) -> &Vec<GridCoord> {
		&self.debug_open
	}
}

/// Octile distance between two cells, admissible for 8-directional movement
/// with the 10/14 weights
pub fn octile_heuristic(node: GridCoord, end: GridCoord) -> i32 {
	let dx = (node.x - end.x).abs();
	let dy = (node.y - end.y).abs();
	10 * (dx + dy) + (14 - 20) * dx.min(dy)
}

/// Manhattan distance between two cells scaled to the orthogonal step weight
pub fn manhattan_heuristic(node: GridCoord, end: GridCoord) -> i32 {
	let dx = (node.x - end.x).abs();
	let dy = (node.y - end.y).abs();
	(dx + dy) * 10
}

/// The heuristic driving [shortest_path]
fn heuristic(node: GridCoord, end: GridCoord) -> i32 {
	octile_heuristic(node, end)
}

/// Find the shortest path over the occupancy mask from `start` to `end`,
/// giving up after `iteration_cap` expansions with a best-effort path toward
/// the open cell closest to `end`.
///
/// Both endpoints must satisfy [GridDimensions::contains] - the solver does
/// not validate them, call sites are expected to pre-check (see
/// [compute_agent_path])
pub fn shortest_path(
	grid: &GridDimensions,
	mask: &OccupancyMask,
	start: GridCoord,
	end: GridCoord,
	iteration_cap: u32,
) -> GridPath {
	let start_index = grid.index(start);
	let end_index = grid.index(end);
	let grid_size = grid.size();

	// parallel working arrays indexed by linear cell index, parent uses
	// grid_size as the unvisited sentinel
	let mut g = vec![0i32; grid_size];
	let mut parent = vec![grid_size; grid_size];
	let mut open: Vec<usize> = Vec::new();
	let coords: Vec<GridCoord> = (0..grid_size).map(|i| grid.coord(i)).collect();

	open.push(start_index);

	let mut iterations: u32 = 0;
	let mut best_cell = start_index;
	while !open.is_empty() {
		// find best cell in open
		let mut best_open_index = 0;
		best_cell = open[best_open_index];
		let mut best_score = g[best_cell] + heuristic(coords[best_cell], end);

		for (i, &cell) in open.iter().enumerate().skip(1) {
			let score = g[cell] + heuristic(coords[cell], end);
			if score <= best_score {
				best_open_index = i;
				best_cell = cell;
				best_score = score;
			}
		}

		iterations += 1;
		if iterations >= iteration_cap {
			// cap reached, fall back to the open cell nearest the end
			best_cell = open[0];
			for &cell in open.iter() {
				if heuristic(coords[cell], end) < heuristic(coords[best_cell], end) {
					best_cell = cell;
				}
			}
			break;
		}

		open.remove(best_open_index);

		// found the end
		if best_cell == end_index {
			break;
		}

		// look at neighbours
		for (offset, weight) in NEIGHBOUR_OFFSETS.iter().zip(NEIGHBOUR_WEIGHTS.iter()) {
			let nbor_coord = coords[best_cell].offset(offset.0, offset.1);

			// out of bounds
			if !grid.contains(nbor_coord) {
				continue;
			}

			let nbor = grid.index(nbor_coord);

			// never overwrite the parent of the start cell
			if nbor == start_index {
				continue;
			}

			if mask.is_blocked(nbor) {
				continue;
			}

			let new_g = g[best_cell] + weight;

			if parent[nbor] == grid_size {
				// unvisited
				g[nbor] = new_g;
				parent[nbor] = best_cell;
				open.push(nbor);
			} else if new_g < g[nbor] {
				// visited, strictly cheaper route found
				g[nbor] = new_g;
				parent[nbor] = best_cell;

				if !open.contains(&nbor) {
					// there is no true closed set, a visited cell leaving
					// the open list is assumed settled - this trips when
					// that assumption breaks
					error!("closed cell {:?} re-evaluated", nbor_coord);
					open.push(nbor);
				}
			}
		}
	}

	// build the path
	let mut path = GridPath {
		points: Vec::new(),
		cost: g[best_cell],
		debug_open: open.iter().map(|&i| coords[i]).collect(),
	};

	let mut cell = best_cell;
	let mut reconstruct_guard = 0;
	let mut seg_counter = 0;

	while cell != grid_size {
		reconstruct_guard += 1;
		if reconstruct_guard >= RECONSTRUCT_WATCHDOG {
			return GridPath::default();
		}

		let c = coords[cell];
		cell = parent[cell];

		// overwrite points that are collinear with the prior two
		if path.points.len() >= 2 && seg_counter < SEG_MAX_LENGTH {
			let c1 = path.points[path.points.len() - 2];
			let c2 = path.points[path.points.len() - 1];

			let dx1 = c2.x - c1.x;
			let dy1 = c2.y - c1.y;
			let dx2 = c.x - c2.x;
			let dy2 = c.y - c2.y;

			if dx1 * dy2 == dx2 * dy1 {
				let last = path.points.len() - 1;
				path.points[last] = c;
				seg_counter += 1;
			} else {
				seg_counter = 0;
				path.points.push(c);
			}
		} else {
			seg_counter = 0;
			path.points.push(c);
		}
	}

	path.points.reverse();

	path
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn open_field_path_is_merged() {
		let grid = GridDimensions::new(10, 10);
		let mask = OccupancyMask::new(&grid);
		let path = shortest_path(
			&grid,
			&mask,
			GridCoord::new(0, 0),
			GridCoord::new(5, 0),
			1000,
		);
		// a straight corridor collapses to its two endpoints
		let actual = vec![GridCoord::new(0, 0), GridCoord::new(5, 0)];
		assert_eq!(actual, *path.get_points());
		assert_eq!(50, path.get_cost());
	}
	#[test]
	fn diagonal_costs_apply() {
		let grid = GridDimensions::new(10, 10);
		let mask = OccupancyMask::new(&grid);
		let path = shortest_path(
			&grid,
			&mask,
			GridCoord::new(0, 0),
			GridCoord::new(4, 4),
			1000,
		);
		assert_eq!(4 * 14, path.get_cost());
		assert_eq!(GridCoord::new(0, 0), path.get_points()[0]);
		assert_eq!(GridCoord::new(4, 4), *path.get_points().last().unwrap());
	}
	#[test]
	fn routes_around_wall() {
		//  ________________________
		// | S|  |  | x|  |  |  |  |
		// |__|__|__|x_|__|__|__|__|
		// |  |  |  | x|  |  |  |  |
		// |__|__|__|x_|__|__|__|__|
		// |  |  |  | x|  |  | E|  |
		// |__|__|__|x_|__|__|__|__|
		// |  |  |  |  |  |  |  |  |
		// |__|__|__|__|__|__|__|__|
		let grid = GridDimensions::new(8, 4);
		let mut mask = OccupancyMask::new(&grid);
		for y in 0..3 {
			mask.set_blocked(grid.index(GridCoord::new(3, y)));
		}
		let path = shortest_path(
			&grid,
			&mask,
			GridCoord::new(0, 0),
			GridCoord::new(6, 2),
			1000,
		);
		for point in path.get_points() {
			assert!(!mask.is_blocked(grid.index(*point)));
		}
		assert_eq!(GridCoord::new(6, 2), *path.get_points().last().unwrap());
	}
	#[test]
	fn sealed_off_end_terminates() {
		//  ______________
		// | S|  |x |  |  |
		// |__|__|x_|__|__|
		// |  |  |x |  |  |
		// |__|__|x_|__|__|
		// |  |  |x |  | E|
		// |__|__|x_|__|__|
		let grid = GridDimensions::new(5, 3);
		let mut mask = OccupancyMask::new(&grid);
		for y in 0..3 {
			mask.set_blocked(grid.index(GridCoord::new(2, y)));
		}
		let path = shortest_path(
			&grid,
			&mask,
			GridCoord::new(0, 0),
			GridCoord::new(4, 2),
			100_000,
		);
		// search exhausts the reachable region and yields a best-effort
		// path that never crosses the wall
		assert!(!path.get_points().is_empty());
		for point in path.get_points() {
			assert!(point.x < 2);
		}
	}
	#[test]
	fn iteration_cap_yields_partial_path() {
		let grid = GridDimensions::new(50, 50);
		let mask = OccupancyMask::new(&grid);
		let path = shortest_path(
			&grid,
			&mask,
			GridCoord::new(0, 0),
			GridCoord::new(49, 49),
			1,
		);
		// first iteration trips the cap before any expansion, leaving only
		// the start on the open list
		let actual = vec![GridCoord::new(0, 0)];
		assert_eq!(actual, *path.get_points());
		assert_eq!(0, path.get_cost());
	}
	#[test]
	fn open_cells_reported_for_debug() {
		let grid = GridDimensions::new(10, 10);
		let mask = OccupancyMask::new(&grid);
		let path = shortest_path(
			&grid,
			&mask,
			GridCoord::new(0, 0),
			GridCoord::new(5, 0),
			1000,
		);
		assert!(!path.get_debug_open().is_empty());
	}
	#[test]
	fn octile_matches_manhattan_on_straight_lines() {
		let a = GridCoord::new(0, 0);
		let b = GridCoord::new(7, 0);
		assert_eq!(manhattan_heuristic(a, b), octile_heuristic(a, b));
		let c = GridCoord::new(3, 3);
		assert_eq!(14 * 3, octile_heuristic(a, c));
	}
}
