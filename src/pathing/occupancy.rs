//! The occupancy mask marks which cells of the grid are impassable. It is
//! derived from the rectangles of player-placed walls and rebuilt wholesale
//! whenever the walls change - there is no incremental diffing.
//!
//! A wall rect is stamped one cell larger on every side so that agents keep a
//! margin from wall geometry:
//!
//! ```text
//!  ________________________
//! |    |    |    |    |    |
//! |  x |  x |  x |  x |  x |
//! |____|____|____|____|____|
//! |    |    |    |    |    |
//! |  x |  W |  W |  W |  x |   W = wall rect, x = stamped margin
//! |____|____|____|____|____|
//! |    |    |    |    |    |
//! |  x |  x |  x |  x |  x |
//! |____|____|____|____|____|
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A wall placed by the player, in grid cells
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub struct WallRect {
	/// Left edge
	pub x: i32,
	/// Top edge
	pub y: i32,
	/// Width in cells
	pub w: i32,
	/// Height in cells
	pub h: i32,
}

impl WallRect {
	/// Create a new instance of [WallRect]
	pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
		WallRect { x, y, w, h }
	}
	/// Grow (negative `margin`) or shrink (positive `margin`) the rect by
	/// `margin` cells on every side
	pub fn with_margin(&self, margin: i32) -> WallRect {
		WallRect::new(
			self.x + margin,
			self.y + margin,
			self.w - 2 * margin,
			self.h - 2 * margin,
		)
	}
}

/// The set of wall rectangles the player has placed
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, Default, Reflect)]
pub struct Walls(Vec<WallRect>);

impl Walls {
	/// Get the wall rects
	pub fn get(&self) -> &Vec<WallRect> {
		&self.0
	}
	/// Add a wall rect. The occupancy mask is not touched until the next
	/// rebuild
	pub fn add(&mut self, wall: WallRect) {
		self.0.push(wall);
	}
	/// Remove every wall
	pub fn clear(&mut self) {
		self.0.clear();
	}
	/// From a `ron` file generate the [Walls]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Self {
		let file = std::fs::File::open(path).expect("Failed opening Walls file");
		let walls: Walls = match ron::de::from_reader(file) {
			Ok(walls) => walls,
			Err(e) => panic!("Failed deserializing Walls: {}", e),
		};
		walls
	}
}

/// One integer per grid cell, `0` = passable, nonzero = blocked
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, Default)]
pub struct OccupancyMask(Vec<u8>);

impl OccupancyMask {
	/// Create a fully passable mask sized to the grid
	pub fn new(grid: &GridDimensions) -> Self {
		OccupancyMask(vec![0; grid.size()])
	}
	/// Get the raw per-cell values
	pub fn get(&self) -> &Vec<u8> {
		&self.0
	}
	/// Whether the cell at `index` is impassable. The index must be within
	/// the grid, this is the caller's contract
	pub fn is_blocked(&self, index: usize) -> bool {
		self.0[index] != 0
	}
	/// Mark a single cell as impassable
	pub fn set_blocked(&mut self, index: usize) {
		self.0[index] = 1;
	}
	/// Whether `coord` is both in bounds and passable
	pub fn is_open_cell(&self, grid: &GridDimensions, coord: GridCoord) -> bool {
		grid.contains(coord) && !self.is_blocked(grid.index(coord))
	}
	/// Throw away the current mask and re-stamp every wall, each expanded by
	/// a one cell margin and clipped to the grid
	pub fn rebuild(&mut self, grid: &GridDimensions, walls: &Walls) {
		self.0 = vec![0; grid.size()];
		for wall in walls.get() {
			let stamp = wall.with_margin(-1);
			for i in 0..stamp.w {
				for j in 0..stamp.h {
					let coord = GridCoord::new(stamp.x + i, stamp.y + j);
					if grid.contains(coord) {
						self.0[grid.index(coord)] = 1;
					}
				}
			}
		}
	}
}
