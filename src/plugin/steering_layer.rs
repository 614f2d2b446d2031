//! Logic for driving the flow-field propagation slice and the agent
//! locomotion tick
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

/// Request to add an agent to the population of each simulation entity,
/// walking toward that entity's [FlowFieldTarget]
#[derive(Event)]
pub struct EventSpawnAgent {
	/// Where the agent enters the world, in grid units
	position: Vec2,
}

impl EventSpawnAgent {
	/// Create a new instance of [EventSpawnAgent]
	pub fn new(position: Vec2) -> Self {
		EventSpawnAgent { position }
	}
	/// Get the spawn position
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
}

/// Tracks which half of the grid the next propagation slice visits. The
/// parity flips every tick so that over two ticks every cell is relaxed once
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct PropagationSchedule {
	/// Index parity of the next slice, `0` or `1`
	parity: usize,
}

impl PropagationSchedule {
	/// Flip to the other parity and return the one to scan this tick
	pub fn advance(&mut self) -> usize {
		self.parity = (self.parity + 1) % 2;
		self.parity
	}
}

/// The seeded randomness source behind steering jitter and repath timers.
/// Deterministic for a fixed seed, no cross-platform guarantee is made
#[derive(Resource)]
pub struct SteeringRng(pub SmallRng);

impl SteeringRng {
	/// Create a new instance of [SteeringRng] from a seed
	pub fn new(seed: u64) -> Self {
		SteeringRng(SmallRng::seed_from_u64(seed))
	}
}

/// Relax one budgeted slice of every [PathGrid] - half of the cells,
/// alternating halves across ticks. Runs forever, there is no completion
/// state to reach
pub fn propagate_path_grid(
	mut query: Query<(
		&GridDimensions,
		&OccupancyMask,
		&mut PathGrid,
		&mut PropagationSchedule,
		&FlowFieldTarget,
	)>,
) {
	for (grid, mask, mut path_grid, mut schedule, target) in query.iter_mut() {
		let parity = schedule.advance();
		path_grid.propagate_slice(grid, mask, target.get(), parity);
	}
}

/// Read [EventSpawnAgent] and add agents to every simulation entity's
/// population, targeting its flow-field target cell
pub fn spawn_agents(
	mut events: EventReader<EventSpawnAgent>,
	mut query: Query<(&mut Population, &FlowFieldTarget)>,
) {
	for event in events.read() {
		for (mut population, target) in query.iter_mut() {
			let goal = Vec2::new(target.get().x as f32, target.get().y as f32);
			let id = population.add_agent(event.get_position(), goal);
			trace!("Spawned agent {:?} at {}", id, event.get_position());
		}
	}
}

/// Advance every population one tick along the flow field, then remove the
/// agents that arrived at their target
pub fn tick_agents(
	mut rng: ResMut<SteeringRng>,
	timestep: Res<SimTimestep>,
	mut query: Query<(&GridDimensions, &OccupancyMask, &PathGrid, &mut Population)>,
) {
	for (grid, mask, path_grid, mut population) in query.iter_mut() {
		population.arrived.clear();
		population.tick_mass_steering(grid, mask, path_grid, &mut rng.0, timestep.0);
		let arrived = std::mem::take(&mut population.arrived);
		for id in arrived {
			population.remove_agent(id);
		}
	}
}
