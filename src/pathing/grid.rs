//! A world is a fixed-size rectangular grid of cells. [GridDimensions] maps
//! 2D integer coordinates to and from a flat linear index over that grid,
//! where `index = x + y * width`. The mapping is bijective over
//! `[0, width * height)`.
//!
//! Neither [GridDimensions::index] nor [GridDimensions::coord] validate their
//! input: callers are expected to guard any indexed access with
//! [GridDimensions::contains] first
//!

use bevy::prelude::*;

/// A cell position on the grid. Signed so that neighbour offsets of boundary
/// cells can be represented (and rejected by [GridDimensions::contains])
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Reflect)]
pub struct GridCoord {
	/// Column of the cell
	pub x: i32,
	/// Row of the cell
	pub y: i32,
}

impl GridCoord {
	/// Create a new instance of [GridCoord]
	pub fn new(x: i32, y: i32) -> Self {
		GridCoord { x, y }
	}
	/// The coordinate displaced by `(dx, dy)`, which may lie outside the grid
	pub fn offset(&self, dx: i32, dy: i32) -> GridCoord {
		GridCoord::new(self.x + dx, self.y + dy)
	}
}

/// The width (`x`) and height (`y`) of the world grid in cells. Immutable
/// between resize events - resizing replaces the component wholesale
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub struct GridDimensions {
	/// Number of columns
	width: i32,
	/// Number of rows
	height: i32,
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions]
	pub fn new(width: i32, height: i32) -> Self {
		if width <= 0 || height <= 0 {
			panic!(
				"Grid dimensions `({}, {})` are invalid, width and height must both be positive",
				width, height
			);
		}
		GridDimensions { width, height }
	}
	/// Get the number of columns
	pub fn get_width(&self) -> i32 {
		self.width
	}
	/// Get the number of rows
	pub fn get_height(&self) -> i32 {
		self.height
	}
	/// Total number of cells on the grid
	pub fn size(&self) -> usize {
		(self.width * self.height) as usize
	}
	/// The cell at the centre of the grid
	pub fn centre(&self) -> GridCoord {
		GridCoord::new(self.width / 2, self.height / 2)
	}
	/// Convert a coordinate to its linear index. The coordinate must satisfy
	/// [GridDimensions::contains], this is the caller's contract
	pub fn index(&self, coord: GridCoord) -> usize {
		(coord.x + coord.y * self.width) as usize
	}
	/// Convert a linear index back to a coordinate. The index must be less
	/// than [GridDimensions::size], this is the caller's contract
	pub fn coord(&self, index: usize) -> GridCoord {
		GridCoord::new(index as i32 % self.width, index as i32 / self.width)
	}
	/// Bounds test with no wraparound
	pub fn contains(&self, coord: GridCoord) -> bool {
		coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
	}
}
