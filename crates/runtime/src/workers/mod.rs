//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the arena state and runs the fixed-rate tick.

mod simulation;

pub use simulation::{Command, SimulationWorker};
