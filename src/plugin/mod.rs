//! Defines the Bevy [Plugin] for the tycoon pathing simulation
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod steering_layer;
pub mod wall_layer;

/// Orders the per-tick work so that an occupancy rebuild always
/// happens-before the flow field reads it and before any agent moves - both
/// consume the same occupancy snapshot within a tick
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Rebuild the occupancy mask from wall edits
	Rebuild,
	/// Advance the flow-field wavefront by one budgeted slice
	Propagate,
	/// Spawn and move agents
	Steer,
}

/// Seconds of simulated time per tick, fixed - the locomotion passes were
/// tuned against a constant timestep
#[derive(Resource, Clone, Copy, Debug, Reflect)]
pub struct SimTimestep(pub f32);

impl Default for SimTimestep {
	fn default() -> Self {
		SimTimestep(1.0 / 60.0)
	}
}

/// Plugin to setup and run the tycoon pathing simulation: wall-driven
/// occupancy rebuilds, amortized flow-field propagation and the mass-agent
/// locomotion tick
pub struct TycoonPathingPlugin {
	/// Seed for the steering jitter source, the simulation is deterministic
	/// for a fixed seed on a given platform
	pub seed: u64,
}

impl TycoonPathingPlugin {
	/// Create a new instance of [TycoonPathingPlugin] with a jitter seed
	pub fn new(seed: u64) -> Self {
		TycoonPathingPlugin { seed }
	}
}

impl Default for TycoonPathingPlugin {
	fn default() -> Self {
		TycoonPathingPlugin::new(0)
	}
}

impl Plugin for TycoonPathingPlugin {
	fn build(&self, app: &mut App) {
		app.register_type::<GridCoord>()
			.register_type::<GridDimensions>()
			.register_type::<WallRect>()
			.register_type::<Walls>()
			.register_type::<AgentId>()
			.register_type::<FlowFieldTarget>()
			.register_type::<PropagationSchedule>()
			.register_type::<SimTimestep>()
			.insert_resource(SteeringRng::new(self.seed))
			.insert_resource(SimTimestep::default())
			.add_event::<EventWallsChanged>()
			.add_event::<EventSpawnAgent>()
			.configure_sets(
				Update,
				(
					OrderingSet::Rebuild,
					OrderingSet::Propagate,
					OrderingSet::Steer,
				)
					.chain(),
			)
			.add_systems(
				Update,
				(
					wall_layer::process_wall_changes.in_set(OrderingSet::Rebuild),
					steering_layer::propagate_path_grid.in_set(OrderingSet::Propagate),
					(steering_layer::spawn_agents, steering_layer::tick_agents)
						.chain()
						.in_set(OrderingSet::Steer),
				),
			);
	}
}
