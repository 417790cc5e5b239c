//! Finished run, as handed to analysis code.

use serde::{Deserialize, Serialize};

use crate::error::{OsloError, Result};
use crate::recorder::Recorder;

/// Everything a run produced.
///
/// The full series stay available when no crossover happened; only the
/// recurrent-phase accessors fail in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub system_size: usize,
    /// Probability of threshold 1 as reported by the threshold source.
    /// `None` for sources without one, such as a replayed sequence.
    pub probability: Option<f64>,
    /// Grains added over the run.
    pub steps: u64,
    /// Index of the crossover step in the series, if a grain ever left.
    pub crossover_time: Option<u64>,
    /// `(<z> / 2) L² (1 + 1/L)` from the final gradient profile.
    pub crossover_time_theory: f64,
    recorder: Recorder,
}

impl RunOutput {
    pub(crate) fn new(
        system_size: usize,
        probability: Option<f64>,
        crossover_time: Option<u64>,
        crossover_time_theory: f64,
        recorder: Recorder,
    ) -> Self {
        Self {
            system_size,
            probability,
            steps: recorder.len(),
            crossover_time,
            crossover_time_theory,
            recorder,
        }
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Height at site 0 after every step.
    pub fn heights(&self) -> Result<&[u32]> {
        self.recorder.full_series().map(|(h, _)| h)
    }

    /// Topple count of every step.
    pub fn avalanche_sizes(&self) -> Result<&[u64]> {
        self.recorder.full_series().map(|(_, s)| s)
    }

    pub fn recurrent_heights(&self) -> Result<&[u32]> {
        self.recorder
            .recurrent_series(self.crossover_time)
            .map(|(h, _)| h)
    }

    pub fn recurrent_avalanche_sizes(&self) -> Result<&[u64]> {
        self.recorder
            .recurrent_series(self.crossover_time)
            .map(|(_, s)| s)
    }

    /// The crossover time, or an error if the run never reached it.
    pub fn require_crossover(&self) -> Result<u64> {
        self.crossover_time
            .ok_or(OsloError::CrossoverNotReached { steps: self.steps })
    }

    /// Mean height over the recurrent phase.
    pub fn mean_recurrent_height(&self) -> Result<f64> {
        let heights = self.recurrent_heights()?;
        let total: u64 = heights.iter().map(|&h| u64::from(h)).sum();
        Ok(total as f64 / heights.len() as f64)
    }

    /// Largest avalanche among the retained samples.
    pub fn max_avalanche_size(&self) -> Option<u64> {
        self.recorder.retained_series().1.iter().copied().max()
    }
}
