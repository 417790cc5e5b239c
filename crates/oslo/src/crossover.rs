//! Crossover detection.
//!
//! The crossover time is the step at which a grain first leaves the pile
//! through the open boundary. It separates the transient phase, where the
//! pile is still filling, from the recurrent phase used for steady-state
//! statistics.

use serde::{Deserialize, Serialize};

use crate::lattice::Avalanche;

/// Records the first step whose avalanche ejected a grain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossoverDetector {
    time: Option<u64>,
}

impl CrossoverDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the avalanche produced at `step`.
    ///
    /// # Arguments
    /// * `step` - Number of grains added before the one that caused `avalanche`
    /// * `avalanche` - Result of relaxing after that grain
    ///
    /// # Returns
    /// true only for the call that fixes the crossover time
    pub fn observe(&mut self, step: u64, avalanche: &Avalanche) -> bool {
        if self.time.is_some() || avalanche.exits == 0 {
            return false;
        }
        self.time = Some(step);
        true
    }

    pub fn reached(&self) -> bool {
        self.time.is_some()
    }

    pub fn time(&self) -> Option<u64> {
        self.time
    }
}

/// Analytic estimate of the crossover time.
///
/// ```text
/// t_c ≈ (<z> / 2) · L² · (1 + 1/L)
/// ```
///
/// `<z>` is the mean gradient; evaluated on a pile that has settled into
/// its recurrent profile, this is the number of grains a full pile holds.
pub fn crossover_time_theory(mean_gradient: f64, system_size: usize) -> f64 {
    let l = system_size as f64;
    (mean_gradient / 2.0) * l * l * (1.0 + 1.0 / l)
}
