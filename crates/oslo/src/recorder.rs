//! Time series of a run.
//!
//! One height sample and one avalanche size are appended per grain, so both
//! series always share the same indexing: entry `t` belongs to the grain
//! added after `t` earlier grains.
//!
//! In [`Recording::RecurrentOnly`] mode the transient prefix is dropped as
//! soon as the crossover time is known. Indices stay absolute; the recorder
//! remembers where its retained data starts.

use serde::{Deserialize, Serialize};

use crate::error::{OsloError, Result};

/// How much history a run keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Recording {
    /// Keep every sample.
    #[default]
    Full,
    /// Drop samples before the crossover once it is known.
    RecurrentOnly,
}

/// Append-only height and avalanche-size history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recorder {
    mode: Recording,
    heights: Vec<u32>,
    avalanche_sizes: Vec<u64>,
    retained_from: u64,
}

impl Recorder {
    pub fn new(mode: Recording) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Recorder with room for `steps` samples.
    pub fn with_capacity(mode: Recording, steps: usize) -> Self {
        Self {
            mode,
            heights: Vec::with_capacity(steps),
            avalanche_sizes: Vec::with_capacity(steps),
            retained_from: 0,
        }
    }

    pub fn mode(&self) -> Recording {
        self.mode
    }

    pub fn append(&mut self, height: u32, avalanche_size: u64) {
        self.heights.push(height);
        self.avalanche_sizes.push(avalanche_size);
    }

    /// Total number of samples appended, including discarded ones.
    pub fn len(&self) -> u64 {
        self.retained_from + self.heights.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute index of the first retained sample.
    pub fn retained_from(&self) -> u64 {
        self.retained_from
    }

    /// Tell the recorder where the recurrent phase starts.
    ///
    /// Only has an effect in [`Recording::RecurrentOnly`] mode.
    pub fn mark_crossover(&mut self, crossover_time: u64) {
        if self.mode != Recording::RecurrentOnly || crossover_time <= self.retained_from {
            return;
        }
        let drop = ((crossover_time - self.retained_from) as usize).min(self.heights.len());
        self.heights.drain(..drop);
        self.avalanche_sizes.drain(..drop);
        self.retained_from += drop as u64;
    }

    /// Both series from the first grain on.
    ///
    /// # Errors
    /// `HistoryDiscarded` if the transient prefix was dropped.
    pub fn full_series(&self) -> Result<(&[u32], &[u64])> {
        if self.retained_from > 0 {
            return Err(OsloError::HistoryDiscarded {
                retained_from: self.retained_from,
            });
        }
        Ok((&self.heights, &self.avalanche_sizes))
    }

    /// Both series from `crossover_time` on.
    ///
    /// # Errors
    /// * `CrossoverNotReached` if `crossover_time` is `None`
    /// * `EmptyRecurrentPhase` if `crossover_time` is at or past the end
    /// * `HistoryDiscarded` if the requested start was already dropped
    pub fn recurrent_series(&self, crossover_time: Option<u64>) -> Result<(&[u32], &[u64])> {
        let recorded = self.len();
        let crossover_time =
            crossover_time.ok_or(OsloError::CrossoverNotReached { steps: recorded })?;
        if crossover_time >= recorded {
            return Err(OsloError::EmptyRecurrentPhase {
                crossover_time,
                recorded,
            });
        }
        if crossover_time < self.retained_from {
            return Err(OsloError::HistoryDiscarded {
                retained_from: self.retained_from,
            });
        }
        let start = (crossover_time - self.retained_from) as usize;
        Ok((&self.heights[start..], &self.avalanche_sizes[start..]))
    }

    /// The retained samples, whatever the mode.
    pub fn retained_series(&self) -> (&[u32], &[u64]) {
        (&self.heights, &self.avalanche_sizes)
    }
}
