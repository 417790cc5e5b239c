//! Drive/relax loop for a single Oslo model run.
//!
//! # Update Sequence
//!
//! Each step proceeds in this order:
//! 1. Add a grain at site 0
//! 2. Relax the lattice until stable, counting topples
//! 3. Let the crossover detector see the avalanche
//! 4. Advance the step counter
//! 5. Record the height at site 0 and the avalanche size
//!
//! The stop policy is evaluated after every step. A run is fully
//! deterministic given its threshold stream.

mod driver;
mod output;
mod state;

#[cfg(test)]
mod driver_test;

pub use driver::{Simulation, run_simulation};
pub use output::RunOutput;
pub use state::{RunPhase, RunState};
