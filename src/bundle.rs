//! Spawning one [TycoonPathingBundle] gives an entity everything the plugin
//! systems need to simulate a world: grid geometry, walls and their derived
//! occupancy mask, the flow field with its target and amortization schedule,
//! and an empty agent population
//!

use crate::prelude::*;
use bevy::prelude::*;

/// All components of one simulated world
#[derive(Bundle)]
pub struct TycoonPathingBundle {
	/// Geometry of the world grid
	grid: GridDimensions,
	/// Player-placed wall rects
	walls: Walls,
	/// Per-cell passability derived from the walls
	occupancy: OccupancyMask,
	/// Flow field steering the crowd
	path_grid: PathGrid,
	/// Cell the flow field propagates toward
	flow_target: FlowFieldTarget,
	/// Parity cursor of the amortized propagation
	schedule: PropagationSchedule,
	/// The agents
	population: Population,
}

impl TycoonPathingBundle {
	/// Create a new instance of [TycoonPathingBundle] over an empty grid,
	/// with the flow field targeting the grid centre as the reference layout
	/// does
	pub fn new(width: i32, height: i32) -> Self {
		TycoonPathingBundle::with_walls(width, height, Walls::default())
	}
	/// Create a new instance of [TycoonPathingBundle] where the wall layout
	/// is loaded from a `ron` file on disk
	#[cfg(feature = "ron")]
	pub fn new_from_disk(width: i32, height: i32, path: &str) -> Self {
		TycoonPathingBundle::with_walls(width, height, Walls::from_ron(path.to_string()))
	}
	/// Create a new instance of [TycoonPathingBundle] from an explicit wall
	/// layout, with the occupancy mask already rebuilt and the flow field
	/// seeded
	pub fn with_walls(width: i32, height: i32, walls: Walls) -> Self {
		let grid = GridDimensions::new(width, height);
		let target = grid.centre();
		let mut occupancy = OccupancyMask::new(&grid);
		occupancy.rebuild(&grid, &walls);
		let mut path_grid = PathGrid::new(&grid);
		path_grid.reset(&grid, target);
		TycoonPathingBundle {
			grid,
			walls,
			occupancy,
			path_grid,
			flow_target: FlowFieldTarget::new(target),
			schedule: PropagationSchedule::default(),
			population: Population::default(),
		}
	}
}
