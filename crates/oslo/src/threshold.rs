//! Critical slope generation.
//!
//! Every site carries a threshold slope of either 1 or 2. A fresh value is
//! drawn for each site when the lattice is built and again every time the
//! site topples. The lattice only sees the [`ThresholdSource`] trait, so a
//! run can be driven by a seeded generator or by a replayed sequence.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::error::{OsloError, Result};

/// Threshold drawn with probability `p`.
pub const LOW_THRESHOLD: u32 = 1;

/// Threshold drawn with probability `1 - p`.
pub const HIGH_THRESHOLD: u32 = 2;

/// Draw a single threshold.
///
/// # Arguments
/// * `rng` - Source of uniform draws in [0, 1)
/// * `probability` - Probability of returning [`LOW_THRESHOLD`]
///
/// # Returns
/// [`LOW_THRESHOLD`] with probability `probability`, else [`HIGH_THRESHOLD`]
pub fn draw_threshold<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> u32 {
    let r: f64 = rng.random();
    if r < probability {
        LOW_THRESHOLD
    } else {
        HIGH_THRESHOLD
    }
}

/// Check that `probability` is a usable threshold probability.
pub fn validate_probability(probability: f64) -> Result<()> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(OsloError::invalid(format!(
            "threshold probability must lie in [0, 1], got {probability}"
        )));
    }
    Ok(())
}

/// Anything that can hand the lattice its next threshold.
///
/// Implementations must only ever return [`LOW_THRESHOLD`] or
/// [`HIGH_THRESHOLD`].
pub trait ThresholdSource {
    fn next_threshold(&mut self) -> u32;

    /// Probability of drawing [`LOW_THRESHOLD`], if the source has one.
    fn probability(&self) -> Option<f64> {
        None
    }
}

impl<S: ThresholdSource + ?Sized> ThresholdSource for &mut S {
    fn next_threshold(&mut self) -> u32 {
        (**self).next_threshold()
    }

    fn probability(&self) -> Option<f64> {
        (**self).probability()
    }
}

impl<S: ThresholdSource + ?Sized> ThresholdSource for Box<S> {
    fn next_threshold(&mut self) -> u32 {
        (**self).next_threshold()
    }

    fn probability(&self) -> Option<f64> {
        (**self).probability()
    }
}

/// Thresholds drawn from a seeded ChaCha stream.
#[derive(Clone)]
pub struct RandomThresholds {
    probability: f64,
    rng: ChaChaRng,
}

impl RandomThresholds {
    /// Wrap an existing generator.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `probability` is outside [0, 1].
    pub fn new(probability: f64, rng: ChaChaRng) -> Result<Self> {
        validate_probability(probability)?;
        Ok(Self { probability, rng })
    }

    /// Build a generator from a 64-bit seed.
    pub fn from_seed(probability: f64, seed: u64) -> Result<Self> {
        Self::new(probability, ChaChaRng::seed_from_u64(seed))
    }
}

impl fmt::Debug for RandomThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomThresholds")
            .field("probability", &self.probability)
            .finish_non_exhaustive()
    }
}

impl ThresholdSource for RandomThresholds {
    fn next_threshold(&mut self) -> u32 {
        draw_threshold(&mut self.rng, self.probability)
    }

    fn probability(&self) -> Option<f64> {
        Some(self.probability)
    }
}

/// Replays a fixed sequence of thresholds.
///
/// Once the sequence is used up the replay starts again from the first
/// value. Those repeated values are not a continuation of whatever
/// produced the sequence, so a faithful replay must finish with
/// [`has_wrapped`](Self::has_wrapped) still false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedThresholds {
    draws: Vec<u32>,
    cursor: usize,
}

impl ScriptedThresholds {
    /// # Errors
    /// `InvalidConfiguration` if `draws` is empty or holds a value other
    /// than 1 or 2.
    pub fn new(draws: Vec<u32>) -> Result<Self> {
        if draws.is_empty() {
            return Err(OsloError::invalid("scripted threshold sequence is empty"));
        }
        if let Some(bad) = draws
            .iter()
            .find(|&&z| z != LOW_THRESHOLD && z != HIGH_THRESHOLD)
        {
            return Err(OsloError::invalid(format!(
                "scripted threshold {bad} is not 1 or 2"
            )));
        }
        Ok(Self { draws, cursor: 0 })
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Length of one pass through the sequence.
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// True once a value has been served for the second time.
    pub fn has_wrapped(&self) -> bool {
        self.cursor > self.draws.len()
    }
}

impl ThresholdSource for ScriptedThresholds {
    fn next_threshold(&mut self) -> u32 {
        let z = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        z
    }
}

/// Passes draws through from an inner source and keeps a copy of each.
#[derive(Debug, Clone)]
pub struct RecordingThresholds<S> {
    inner: S,
    draws: Vec<u32>,
}

impl<S: ThresholdSource> RecordingThresholds<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[u32] {
        &self.draws
    }

    pub fn into_draws(self) -> Vec<u32> {
        self.draws
    }
}

impl<S: ThresholdSource> ThresholdSource for RecordingThresholds<S> {
    fn next_threshold(&mut self) -> u32 {
        let z = self.inner.next_threshold();
        self.draws.push(z);
        z
    }

    fn probability(&self) -> Option<f64> {
        self.inner.probability()
    }
}
