//! The spatial-reasoning subsystem: grid indexing, the two A* variants and
//! the incremental flow-field propagator
//!

pub mod astar;
pub mod grid;
pub mod grid_astar;
pub mod occupancy;
pub mod path_grid;
