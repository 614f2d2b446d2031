//! `use bevy_tycoon_pathing_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::pathing::{grid::*, astar::*, grid_astar::*, occupancy::*, path_grid::*};

#[doc(hidden)]
pub use crate::sim::{locomotion::*, population::*};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{steering_layer::*, wall_layer::*, *},
};
