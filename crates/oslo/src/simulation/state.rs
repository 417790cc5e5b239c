//! Orchestration-level run state.

use serde::{Deserialize, Serialize};

use crate::crossover::CrossoverDetector;

/// Whether the drive loop is still stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    Running,
    Stopped,
}

/// Counters and flags that live outside the lattice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Grains added so far, i.e. elapsed time
    pub count: u64,
    /// Topples caused by the most recent grain
    pub last_avalanche_size: u64,
    pub crossover: CrossoverDetector,
    pub phase: RunPhase,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crossover_time(&self) -> Option<u64> {
        self.crossover.time()
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }
}
