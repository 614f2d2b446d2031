//! The path grid is a flow field over the whole world: for every unblocked
//! cell it holds a monotonically relaxing "distance to target" cost and a
//! 4-bit mask of which orthogonal neighbours are cheapest to step into.
//!
//! It is not a single-shot solver. [PathGrid::iterate] relaxes exactly one
//! cell from its neighbours and the driver ([PathGrid::propagate_slice])
//! visits half the grid per tick, alternating index parity between ticks, so
//! the wavefront expands from the target a little further every tick forever.
//! There is no convergence flag - values near the target stabilise within a
//! handful of ticks while far cells stay stale for proportionally longer,
//! which mass steering tolerates because it only needs locally-correct
//! gradients.
//!
//! After enough full-coverage passes over an unchanged mask every reachable
//! cell's cost equals its 4-directional grid distance to the target:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  0  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Cost of a cell the wavefront has not reached (or cannot reach)
pub const COST_SENTINEL: i32 = i32::MAX;

/// Flow bit marking the `+x` neighbour as cheapest
pub const BITS_POS_X: u8 = 0b1000;
/// Flow bit marking the `-x` neighbour as cheapest
pub const BITS_NEG_X: u8 = 0b0100;
/// Flow bit marking the `+y` neighbour as cheapest
pub const BITS_POS_Y: u8 = 0b0010;
/// Flow bit marking the `-y` neighbour as cheapest
pub const BITS_NEG_Y: u8 = 0b0001;

/// Orthogonal neighbour offsets in flow-bit order: the bit for offset `i` is
/// `1 << (3 - i)`
const FLOW_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Per-cell cost and flow-direction arrays relaxed incrementally toward a
/// single target cell. Sized and reset whenever the grid or occupancy
/// changes, since stale costs would otherwise leak through wall edits
#[derive(Component, Clone, Debug, Default)]
pub struct PathGrid {
	/// Saturating distance-to-target per cell, [COST_SENTINEL] = unreached
	costs: Vec<i32>,
	/// Bitmask per cell of the neighbours tied for cheapest cost
	flow: Vec<u8>,
}

impl PathGrid {
	/// Create a new instance of [PathGrid] sized to the grid with every cell
	/// unreached
	pub fn new(grid: &GridDimensions) -> Self {
		PathGrid {
			costs: vec![COST_SENTINEL; grid.size()],
			flow: vec![0; grid.size()],
		}
	}
	/// Throw away all progress and seed the wavefront: every cell back to
	/// [COST_SENTINEL] except the `target` cell at cost `0`
	pub fn reset(&mut self, grid: &GridDimensions, target: GridCoord) {
		self.costs = vec![COST_SENTINEL; grid.size()];
		self.flow = vec![0; grid.size()];
		self.costs[grid.index(target)] = 0;
	}
	/// Get the per-cell costs, read-only debug surface
	pub fn get_costs(&self) -> &Vec<i32> {
		&self.costs
	}
	/// Get the per-cell flow masks, read-only debug surface
	pub fn get_flow(&self) -> &Vec<u8> {
		&self.flow
	}
	/// Cost of the cell at `index`. The index must be within the grid, this
	/// is the caller's contract
	pub fn cost(&self, index: usize) -> i32 {
		self.costs[index]
	}
	/// Flow mask of the cell at `index`. The index must be within the grid,
	/// this is the caller's contract
	pub fn flow(&self, index: usize) -> u8 {
		self.flow[index]
	}
	/// Relax a single cell from its four orthogonal neighbours: its cost
	/// becomes the cheapest neighbour cost plus one (saturating at
	/// [COST_SENTINEL]) and its flow mask records every neighbour tied for
	/// that minimum. Blocked cells are skipped entirely
	pub fn iterate(&mut self, grid: &GridDimensions, mask: &OccupancyMask, coord: GridCoord) {
		let index = grid.index(coord);

		// skip cells that are masked out
		if mask.is_blocked(index) {
			return;
		}

		let mut cheapest_cost = COST_SENTINEL;
		let mut cheap_mask: u8 = 0;
		for (i, offset) in FLOW_OFFSETS.iter().enumerate() {
			let n = coord.offset(offset.0, offset.1);
			if !grid.contains(n) {
				continue;
			}

			let cost = self.costs[grid.index(n)];

			if cost <= cheapest_cost {
				if cost != cheapest_cost {
					cheap_mask = 0;
				}
				cheapest_cost = cost;
				cheap_mask |= 1u8 << (3 - i);
			}
		}

		// prevent overflow
		if cheapest_cost < COST_SENTINEL {
			self.costs[index] = cheapest_cost + 1;
		} else {
			self.costs[index] = COST_SENTINEL;
		}

		self.flow[index] = cheap_mask;
	}
	/// Relax every other cell of the grid, skipping the `target` seed so its
	/// zero cost is never overwritten. `parity` selects the even or odd
	/// linear indices - the tick driver alternates it so that over two ticks
	/// every cell is visited once
	pub fn propagate_slice(
		&mut self,
		grid: &GridDimensions,
		mask: &OccupancyMask,
		target: GridCoord,
		parity: usize,
	) {
		let target_index = grid.index(target);
		let mut i = parity;
		while i < grid.size() {
			if i != target_index {
				self.iterate(grid, mask, grid.coord(i));
			}
			i += 2;
		}
	}
}

/// Map a flow mask to a unit-ish steering direction. Single bits map to axis
/// vectors and adjacent two-bit combinations to diagonals. Conflicting
/// combinations (opposing bits, three or four bits) fall back to fixed
/// defaults rather than geometrically derived vectors - kept verbatim for
/// behavioural compatibility with the reference tables agents were tuned
/// against
pub fn flow_to_direction(bits: u8) -> Vec2 {
	match bits {
		0b1000 => Vec2::new(1.0, 0.0),
		0b0100 => Vec2::new(-1.0, 0.0),
		0b0010 => Vec2::new(0.0, 1.0),
		0b0001 => Vec2::new(0.0, -1.0),

		0b1010 => Vec2::new(0.7, 0.7),
		0b1001 => Vec2::new(0.7, -0.7),
		0b0110 => Vec2::new(-0.7, 0.7),
		0b0101 => Vec2::new(-0.7, -0.7),

		0b1100 => Vec2::new(1.0, 0.0),
		0b0011 => Vec2::new(0.0, 1.0),
		0b1110 => Vec2::new(1.0, 0.0),
		0b0111 => Vec2::new(0.0, 1.0),

		0b1101 => Vec2::new(1.0, 0.0),
		0b1011 => Vec2::new(0.0, 1.0),
		0b1111 => Vec2::new(1.0, 0.0),
		_ => Vec2::new(1.0, 0.0),
	}
}
