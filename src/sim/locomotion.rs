//! The per-tick locomotion passes. Two modes exist:
//!
//! * Mass steering ([Population::tick_mass_steering]) - every agent samples
//!   the flow mask of the cell it stands on and integrates velocity along the
//!   decoded direction. No per-agent search runs at all, which is what makes
//!   large populations cheap
//! * Path following ([Population::tick_path_followers]) - each agent owns an
//!   explicit [GridPath] and walks its waypoints, re-pathing on a randomized
//!   2-3 second timer so a whole crowd never re-paths on the same tick
//!
//! Both are written as batch classification passes over the population's
//! parallel arrays: indices are first split into groups (running/stopped,
//! has-next-waypoint/not, ...) and each group is then processed in bulk.
//!
//! Agents never slide along obstacles: a step into a blocked or out-of-bounds
//! cell simply leaves the agent where it was for that tick
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// Cells walked per second
const WALK_SPEED: f32 = 20.0;
/// Upper bound on integrated velocity magnitude
const MAX_VELOCITY: f32 = 100.0;
/// Acceleration applied along the steering direction
const STEERING_ACCEL: f32 = 1000.0;
/// Scale of the per-agent jitter added to the steering direction
const JITTER_SCALE: f32 = 0.5;
/// An agent closer to its target than this has arrived (mass mode)
const ARRIVE_DISTANCE: f32 = 2.0;
/// Squared distance under which a subtarget counts as the final target
const TARGET_SNAP_DISTANCE_SQ: f32 = 4.0;
/// Iteration budget handed to the grid A* solver on every repath
const REPATH_ITERATION_CAP: u32 = 100;

/// Compute a waypoint route for an agent. Returns [None] when either
/// endpoint lies outside the grid - an explicit "no path" instead of
/// handing invalid coordinates to the solver. The caller owns the result
pub fn compute_agent_path(
	grid: &GridDimensions,
	mask: &OccupancyMask,
	position: Vec2,
	target: Vec2,
) -> Option<GridPath> {
	let start = GridCoord::new(position.x as i32, position.y as i32);
	let end = GridCoord::new(target.x as i32, target.y as i32);

	if !grid.contains(start) || !grid.contains(end) {
		return None;
	}

	Some(shortest_path(grid, mask, start, end, REPATH_ITERATION_CAP))
}

/// One of four fixed jitter angles as a unit vector, scaled by
/// [JITTER_SCALE] at the call site to break up lockstep column formation
fn jitter_direction(rng: &mut impl Rng) -> Vec2 {
	let angle = rng.random_range(0..4) as f32 * 0.25 * 6.28;
	Vec2::new(angle.cos(), angle.sin())
}

impl Population {
	/// Advance every agent one tick along the flow field. Agents within
	/// [ARRIVE_DISTANCE] of their target are appended to
	/// [Population::arrived] for the driver to remove after the tick
	pub fn tick_mass_steering(
		&mut self,
		grid: &GridDimensions,
		mask: &OccupancyMask,
		path_grid: &PathGrid,
		rng: &mut impl Rng,
		delta_time: f32,
	) {
		let step = WALK_SPEED * delta_time;
		let count = self.len();

		// distance to target
		let mut distance = Vec::with_capacity(count);
		for index in 0..count {
			distance.push(self.target[index].distance(self.position[index]));
		}

		// select agents at their target
		for index in 0..count {
			if distance[index] < ARRIVE_DISTANCE {
				self.arrived.push(self.id[index]);
			}
		}

		// sample the flow mask under each agent
		let mut flow_bits = Vec::with_capacity(count);
		for index in 0..count {
			let coord = GridCoord::new(self.position[index].x as i32, self.position[index].y as i32);
			if grid.contains(coord) {
				flow_bits.push(path_grid.flow(grid.index(coord)));
			} else {
				flow_bits.push(0);
			}
		}

		// decode to steering directions with per-agent jitter
		let mut steering = Vec::with_capacity(count);
		for bits in flow_bits {
			let direction = flow_to_direction(bits) + jitter_direction(rng) * JITTER_SCALE;
			steering.push(direction);
		}

		// integrate velocity with a speed clamp
		for index in 0..count {
			self.velocity[index] += steering[index] * STEERING_ACCEL * delta_time;
			let speed = self.velocity[index].length();
			if speed > MAX_VELOCITY {
				self.velocity[index] *= MAX_VELOCITY / speed;
			}
		}

		// integrate position, committing only moves into open cells
		for index in 0..count {
			let speed = self.velocity[index].length();
			if speed > 0.0 {
				let new_position = self.position[index] + self.velocity[index] * step / speed;
				let coord = GridCoord::new(new_position.x as i32, new_position.y as i32);
				if mask.is_open_cell(grid, coord) {
					self.position[index] = new_position;
				}
			}
		}
	}

	/// Advance every path-following agent one tick along its owned waypoint
	/// route, advancing waypoint cursors, expiring repath timers and
	/// re-pathing as needed. Agents stopped at their final target are
	/// appended to [Population::arrived]
	pub fn tick_path_followers(
		&mut self,
		grid: &GridDimensions,
		mask: &OccupancyMask,
		rng: &mut impl Rng,
		delta_time: f32,
	) {
		let step = WALK_SPEED * delta_time;
		let count = self.len();

		// direction and distance to each agent's subtarget
		let mut direction = Vec::with_capacity(count);
		let mut distance = Vec::with_capacity(count);
		for index in 0..count {
			let local = self.subtarget[index] - self.position[index];
			direction.push(local);
			distance.push(local.length());
		}

		// split into running and stopped agents
		let mut running = Vec::new();
		let mut stopped = Vec::new();
		for index in 0..count {
			if distance[index] < step {
				stopped.push(index);
			} else {
				running.push(index);
			}
		}

		// split stopped into agents at final targets and just subtargets
		let mut stopped_at_subtarget = Vec::new();
		let mut stopped_at_target = Vec::new();
		for &index in stopped.iter() {
			if self.target[index].distance_squared(self.subtarget[index]) < TARGET_SNAP_DISTANCE_SQ
			{
				stopped_at_target.push(index);
			} else {
				stopped_at_subtarget.push(index);
			}
		}

		// move running forward
		for &index in running.iter() {
			self.position[index] += step * direction[index] / distance[index];
		}

		// snap stopped onto their subtarget
		for &index in stopped.iter() {
			self.position[index] = self.subtarget[index];
		}

		// split by whether a next waypoint exists
		let mut has_next_target = Vec::new();
		let mut no_next_target = Vec::new();
		let mut no_path = Vec::new();
		for &index in stopped_at_subtarget.iter() {
			match &self.path[index] {
				None => no_path.push(index),
				Some(path) => {
					if self.path_index[index] + 1 < path.get_points().len() {
						has_next_target.push(index);
					} else {
						no_next_target.push(index);
					}
				}
			}
		}

		// advance the waypoint cursor
		for &index in has_next_target.iter() {
			self.path_index[index] += 1;
		}

		// set up the next subtarget, jittered off the exact waypoint when the
		// jittered cell is itself walkable
		for &index in has_next_target.iter() {
			let path = self.path[index].as_ref().unwrap();
			let next_subtarget = path.get_points()[self.path_index[index]];

			let rx = rng.random_range(0..5) - 2;
			let ry = rng.random_range(0..5) - 2;
			let randomized = next_subtarget.offset(rx, ry);

			let chosen = if mask.is_open_cell(grid, randomized) {
				randomized
			} else {
				next_subtarget
			};
			self.subtarget[index] = Vec2::new(chosen.x as f32, chosen.y as f32);
		}

		// select agents whose repath timer may tick down
		let mut can_repath = Vec::new();
		can_repath.extend_from_slice(&running);
		can_repath.extend_from_slice(&no_next_target);

		for &index in can_repath.iter() {
			self.repath_timer[index] -= delta_time;
		}

		// select agents that need a fresh path
		let mut need_repath = Vec::new();
		for &index in can_repath.iter() {
			if self.repath_timer[index] <= 0.0 {
				need_repath.push(index);
			}
		}
		need_repath.extend_from_slice(&no_path);

		// drop stale paths, the owning slot frees each exactly once
		for &index in stopped_at_target.iter() {
			self.path[index] = None;
		}
		for &index in need_repath.iter() {
			self.path[index] = None;
		}

		// repath agents to their targets
		for &index in need_repath.iter() {
			self.path[index] =
				compute_agent_path(grid, mask, self.position[index], self.target[index]);
			self.path_index[index] = 0;
		}

		// randomize the repath timer so crowds don't repath in lockstep
		for &index in need_repath.iter() {
			self.repath_timer[index] = rng.random_range(0..100) as f32 * 0.01 + 2.0;
		}

		// collect agents stopped at their final target
		for &index in stopped_at_target.iter() {
			self.arrived.push(self.id[index]);
		}
	}
}
