//! The customer population as a structure of parallel arrays, one entry per
//! agent. Removal is O(1) swap-with-last-and-pop which invalidates positional
//! indices, so identity across ticks is carried by [AgentId] and resolved
//! through [Population::index_of] - callers must never store a slot index
//! across ticks.
//!
//! Each slot owns at most one [GridPath]; replacing the `Option` drops the
//! old allocation exactly once
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Stable identity of an agent, unique for the lifetime of a [Population]
/// and surviving any amount of slot reshuffling
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Reflect)]
pub struct AgentId(u64);

impl AgentId {
	/// Get the raw id value
	pub fn get(&self) -> u64 {
		self.0
	}
}

/// Parallel arrays describing every live agent. All arrays hold exactly one
/// entry per agent at all times
#[derive(Component, Clone, Debug, Default)]
pub struct Population {
	/// World position in grid units
	pub position: Vec<Vec2>,
	/// Current velocity
	pub velocity: Vec<Vec2>,
	/// The waypoint currently being walked toward
	pub subtarget: Vec<Vec2>,
	/// The final destination
	pub target: Vec<Vec2>,
	/// The owned route of a path-following agent, [None] when steering from
	/// the flow field or awaiting a repath
	pub path: Vec<Option<GridPath>>,
	/// Cursor into the owned path's points
	pub path_index: Vec<usize>,
	/// Seconds until the agent may request a new path
	pub repath_timer: Vec<f32>,
	/// Stable identity of each slot
	pub id: Vec<AgentId>,
	/// Ids of agents that reached their target this tick, drained by the
	/// tick driver
	pub arrived: Vec<AgentId>,
	/// Source of fresh [AgentId] values
	next_id: u64,
}

impl Population {
	/// Number of live agents
	pub fn len(&self) -> usize {
		self.id.len()
	}
	/// Whether no agents are alive
	pub fn is_empty(&self) -> bool {
		self.id.is_empty()
	}
	/// Add an agent at `position` walking toward `target`, returning its
	/// stable id
	pub fn add_agent(&mut self, position: Vec2, target: Vec2) -> AgentId {
		let id = AgentId(self.next_id);
		self.next_id += 1;
		self.position.push(position);
		self.velocity.push(Vec2::ZERO);
		self.subtarget.push(position);
		self.target.push(target);
		self.path.push(None);
		self.path_index.push(0);
		self.repath_timer.push(0.0);
		self.id.push(id);
		id
	}
	/// Resolve an id to its current slot index, valid only until the next
	/// removal
	pub fn index_of(&self, id: AgentId) -> Option<usize> {
		self.id.iter().position(|&i| i == id)
	}
	/// Remove the agent with the given id via swap-and-pop, dropping its
	/// owned path. Returns false if no such agent is alive
	pub fn remove_agent(&mut self, id: AgentId) -> bool {
		let Some(index) = self.index_of(id) else {
			debug!("Attempted to remove unknown agent {:?}", id);
			return false;
		};
		self.position.swap_remove(index);
		self.velocity.swap_remove(index);
		self.subtarget.swap_remove(index);
		self.target.swap_remove(index);
		self.path.swap_remove(index);
		self.path_index.swap_remove(index);
		self.repath_timer.swap_remove(index);
		self.id.swap_remove(index);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	/// Every parallel array must agree on the population size
	fn assert_parallel_lengths(population: &Population) {
		let len = population.len();
		assert_eq!(len, population.position.len());
		assert_eq!(len, population.velocity.len());
		assert_eq!(len, population.subtarget.len());
		assert_eq!(len, population.target.len());
		assert_eq!(len, population.path.len());
		assert_eq!(len, population.path_index.len());
		assert_eq!(len, population.repath_timer.len());
		assert_eq!(len, population.id.len());
	}
	#[test]
	fn arrays_stay_parallel() {
		let mut population = Population::default();
		let target = Vec2::new(5.0, 5.0);
		let a = population.add_agent(Vec2::new(0.0, 0.0), target);
		let b = population.add_agent(Vec2::new(1.0, 0.0), target);
		let c = population.add_agent(Vec2::new(2.0, 0.0), target);
		assert_parallel_lengths(&population);
		assert!(population.remove_agent(b));
		assert_parallel_lengths(&population);
		assert!(population.remove_agent(a));
		assert!(population.remove_agent(c));
		assert_parallel_lengths(&population);
		assert!(population.is_empty());
	}
	#[test]
	fn ids_are_unique() {
		let mut population = Population::default();
		let target = Vec2::ZERO;
		for _ in 0..10 {
			population.add_agent(Vec2::ZERO, target);
		}
		let ids: std::collections::HashSet<u64> =
			population.id.iter().map(|id| id.get()).collect();
		assert_eq!(10, ids.len());
		// ids are never reused after removal
		let removed = population.id[0];
		population.remove_agent(removed);
		let fresh = population.add_agent(Vec2::ZERO, target);
		assert_ne!(removed, fresh);
	}
	#[test]
	fn swap_and_pop_preserves_identity_lookup() {
		let mut population = Population::default();
		let target = Vec2::ZERO;
		let first = population.add_agent(Vec2::new(1.0, 0.0), target);
		let _middle = population.add_agent(Vec2::new(2.0, 0.0), target);
		let last = population.add_agent(Vec2::new(3.0, 0.0), target);
		// removing the head moves the tail into slot 0
		population.remove_agent(first);
		let index = population.index_of(last).unwrap();
		assert_eq!(0, index);
		assert_eq!(Vec2::new(3.0, 0.0), population.position[index]);
	}
	#[test]
	fn removing_unknown_agent_is_a_noop() {
		let mut population = Population::default();
		let id = population.add_agent(Vec2::ZERO, Vec2::ZERO);
		assert!(population.remove_agent(id));
		assert!(!population.remove_agent(id));
	}
}
