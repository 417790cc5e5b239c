//! One-dimensional Oslo sandpile model.
//!
//! Grains are added one at a time to the left end of a lattice of `L`
//! sites. A site whose local gradient exceeds its randomly drawn threshold
//! (1 with probability `p`, else 2) topples and passes one grain to the
//! right; grains that topple off site `L - 1` leave the system. Each grain
//! triggers an avalanche whose size is the number of topples.
//!
//! A run produces two aligned series, the height at site 0 and the
//! avalanche size per grain, plus the crossover time at which the first
//! grain leaves the pile.
//!
//! # Components
//!
//! - [`threshold`] - threshold draws and the [`ThresholdSource`] seam
//! - [`lattice`] - pile state and relaxation
//! - [`crossover`] - first-exit detection and the analytic estimate
//! - [`recorder`] - height and avalanche-size history
//! - [`simulation`] - the drive/relax loop
//! - [`batch`] - independent runs over sizes and repeats, in parallel

pub mod batch;
pub mod config;
pub mod crossover;
pub mod error;
pub mod lattice;
pub mod recorder;
pub mod simulation;
pub mod threshold;

#[cfg(test)]
mod threshold_test;

pub use batch::{BatchJob, BatchRun, run_batch};
pub use config::{SimulationConfig, StopPolicy};
pub use crossover::{CrossoverDetector, crossover_time_theory};
pub use error::{OsloError, Result};
pub use lattice::{Avalanche, Lattice, RelaxationOrder};
pub use recorder::{Recorder, Recording};
pub use simulation::{RunOutput, RunPhase, RunState, Simulation, run_simulation};
pub use threshold::{
    HIGH_THRESHOLD, LOW_THRESHOLD, RandomThresholds, RecordingThresholds, ScriptedThresholds,
    ThresholdSource, draw_threshold,
};
