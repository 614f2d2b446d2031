//! Logic for handling wall edits: the occupancy mask is rebuilt wholesale
//! from the wall rects and the flow field is re-seeded, since every
//! previously propagated cost may have been routed through a cell that is
//! now blocked.
//!
//! Re-seeding does not re-propagate - the flow field becomes consistent with
//! the new occupancy only as the amortized iteration revisits cells over the
//! following ticks, and agents briefly following a stale gradient in the
//! meantime is accepted
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Notifies that the [Walls] of an entity changed and its occupancy data
/// must be rebuilt before the next pathing call
#[derive(Event)]
pub struct EventWallsChanged;

/// The cell the flow field propagates approach costs toward (the shop
/// entrance or similar point of interest)
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct FlowFieldTarget(GridCoord);

impl FlowFieldTarget {
	/// Create a new instance of [FlowFieldTarget]
	pub fn new(coord: GridCoord) -> Self {
		FlowFieldTarget(coord)
	}
	/// Get the target cell
	pub fn get(&self) -> GridCoord {
		self.0
	}
}

/// Read [EventWallsChanged] and rebuild the [OccupancyMask] and re-seed the
/// [PathGrid] of every simulation entity
pub fn process_wall_changes(
	mut events: EventReader<EventWallsChanged>,
	mut query: Query<(
		&GridDimensions,
		&Walls,
		&mut OccupancyMask,
		&mut PathGrid,
		&FlowFieldTarget,
	)>,
) {
	if events.is_empty() {
		return;
	}
	events.clear();
	for (grid, walls, mut mask, mut path_grid, target) in query.iter_mut() {
		debug!("Rebuilding occupancy from {} walls", walls.get().len());
		mask.rebuild(grid, walls);
		path_grid.reset(grid, target.get());
	}
}
