//! Simulation driver: the `Simulator` facade.

/// The `Simulator` facade owning state, configuration, and labels.
pub mod simulator;

pub use simulator::{RunOutcome, Simulator};
