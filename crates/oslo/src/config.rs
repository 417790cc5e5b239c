//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{OsloError, Result};
use crate::lattice::RelaxationOrder;
use crate::recorder::Recording;
use crate::threshold::validate_probability;

/// Default number of sites.
pub const DEFAULT_SYSTEM_SIZE: usize = 64;

/// Default probability of drawing threshold 1.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Default length of a fixed-length run.
pub const DEFAULT_STEPS: u64 = 10_000;

/// When the drive loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopPolicy {
    /// Stop after a fixed number of grains.
    Steps(u64),
    /// Stop `extension` grains after the crossover step.
    ///
    /// Before crossover the loop keeps going. `max_steps` caps that wait;
    /// a run that hits the cap fails with `CrossoverNotReached`.
    AfterCrossover {
        extension: u64,
        max_steps: Option<u64>,
    },
}

impl StopPolicy {
    pub fn after_crossover(extension: u64) -> Self {
        Self::AfterCrossover {
            extension,
            max_steps: None,
        }
    }

    /// Evaluate the policy after a completed step.
    ///
    /// # Arguments
    /// * `count` - Grains added so far
    /// * `crossover_time` - Crossover step, if reached
    pub fn should_stop(&self, count: u64, crossover_time: Option<u64>) -> bool {
        match *self {
            Self::Steps(steps) => count >= steps,
            Self::AfterCrossover {
                extension,
                max_steps,
            } => match crossover_time {
                Some(t_c) => count >= t_c.saturating_add(extension),
                None => max_steps.is_some_and(|cap| count >= cap),
            },
        }
    }

    /// Expected number of steps, when known in advance.
    pub fn planned_steps(&self) -> Option<u64> {
        match *self {
            Self::Steps(steps) => Some(steps),
            Self::AfterCrossover { .. } => None,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Steps(0) => Err(OsloError::invalid("step count must be positive")),
            Self::AfterCrossover { extension: 0, .. } => {
                Err(OsloError::invalid("crossover extension must be positive"))
            }
            Self::AfterCrossover {
                max_steps: Some(0), ..
            } => Err(OsloError::invalid("step cap must be positive")),
            _ => Ok(()),
        }
    }
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self::Steps(DEFAULT_STEPS)
    }
}

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of sites `L`
    pub system_size: usize,
    /// Probability `p` of drawing threshold 1
    pub probability: f64,
    pub stop: StopPolicy,
    pub recording: Recording,
    pub relaxation: RelaxationOrder,
}

impl SimulationConfig {
    /// Default configuration for a pile of `system_size` sites.
    pub fn new(system_size: usize) -> Self {
        Self {
            system_size,
            ..Self::default()
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_stop(mut self, stop: StopPolicy) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_recording(mut self, recording: Recording) -> Self {
        self.recording = recording;
        self
    }

    pub fn with_relaxation(mut self, relaxation: RelaxationOrder) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Reject configurations that cannot produce a run.
    pub fn validate(&self) -> Result<()> {
        if self.system_size < 1 {
            return Err(OsloError::invalid("system size must be at least 1"));
        }
        validate_probability(self.probability)?;
        self.stop.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            system_size: DEFAULT_SYSTEM_SIZE,
            probability: DEFAULT_PROBABILITY,
            stop: StopPolicy::default(),
            recording: Recording::default(),
            relaxation: RelaxationOrder::default(),
        }
    }
}
