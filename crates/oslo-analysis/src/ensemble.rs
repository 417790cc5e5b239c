//! Aggregates over independent runs.

use oslo::RunOutput;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::moments::{mean, std_dev};

/// Mean and spread of one quantity across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// One scalar per run, collected for averaging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ensemble {
    values: Vec<f64>,
}

impl Ensemble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> Result<f64> {
        mean(&self.values)
    }

    pub fn std_dev(&self) -> Result<f64> {
        std_dev(&self.values)
    }

    pub fn summary(&self) -> Result<Summary> {
        Ok(Summary {
            mean: self.mean()?,
            std_dev: self.std_dev()?,
            count: self.len(),
        })
    }
}

impl FromIterator<f64> for Ensemble {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<f64> for Ensemble {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

/// Observed against predicted crossover time for a set of runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverSummary {
    pub observed: Summary,
    pub theory: Summary,
}

impl CrossoverSummary {
    /// `observed.mean / theory.mean - 1`.
    pub fn relative_deviation(&self) -> f64 {
        self.observed.mean / self.theory.mean - 1.0
    }
}

/// Averages `t_c` and its analytic estimate over `outputs`.
///
/// # Errors
/// * `Run(CrossoverNotReached)` if any run never crossed over
/// * `EmptySample` if `outputs` is empty
pub fn summarise_crossover<'a, I>(outputs: I) -> Result<CrossoverSummary>
where
    I: IntoIterator<Item = &'a RunOutput>,
{
    let mut observed = Ensemble::new();
    let mut theory = Ensemble::new();
    for output in outputs {
        observed.push(output.require_crossover()? as f64);
        theory.push(output.crossover_time_theory);
    }
    if observed.is_empty() {
        return Err(AnalysisError::EmptySample);
    }

    Ok(CrossoverSummary {
        observed: observed.summary()?,
        theory: theory.summary()?,
    })
}
