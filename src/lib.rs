//! This is a plugin for the Bevy game engine providing the simulation core of
//! a top-down tycoon game: a tile-grid world where player-placed walls
//! constrain pathfinding, an amortized flow-field ("path grid") steers large
//! crowds cheaply and a grid A* solver produces explicit waypoint routes for
//! individual agents
//!

pub mod pathing;
pub mod sim;
pub mod bundle;
pub mod plugin;

pub mod prelude;
