//! The agent population and the per-tick locomotion passes that consume the
//! pathing subsystem
//!

pub mod locomotion;
pub mod population;
