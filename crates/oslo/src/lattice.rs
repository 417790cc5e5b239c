//! Lattice state and relaxation engine.
//!
//! The pile is stored as per-site heights together with the local gradients
//! `z[i] = h[i] - h[i + 1]`, where the site beyond the open boundary has a
//! fixed height of zero. Grains are always added at site 0 and can only
//! leave through site `L - 1`.
//!
//! # Toppling
//!
//! A site topples when its gradient exceeds its threshold. One grain moves one
//! site to the right:
//!
//! ```text
//! 0 < i < L-1 :  z[i] -= 2, z[i-1] += 1, z[i+1] += 1
//! i = 0       :  z[0] -= 2, z[1] += 1
//! i = L-1     :  z[L-1] -= 1, z[L-2] += 1        (grain leaves the pile)
//! ```
//!
//! With `L = 1` the single site only follows the boundary rule. After every
//! topple the site's threshold is redrawn.
//!
//! # Stability
//!
//! `relax` returns only once `z[i] <= threshold[i]` everywhere. Every topple
//! either moves a grain towards the boundary or removes it, so relaxation
//! always terminates.

use serde::{Deserialize, Serialize};

use crate::crossover::crossover_time_theory;
use crate::error::{OsloError, Result};
use crate::threshold::{RandomThresholds, ThresholdSource};

/// Scheduling of topples during one relaxation.
///
/// Both orders reach the same stable configuration and topple count when
/// thresholds are deterministic. With random thresholds they consume the
/// draws in a different order, so individual runs differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelaxationOrder {
    /// Repeated left-to-right sweeps until a sweep topples nothing.
    #[default]
    Sweep,
    /// Depth-first worklist seeded with site 0.
    Stack,
}

/// Outcome of relaxing the lattice after one grain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Avalanche {
    /// Number of topples.
    pub size: u64,
    /// Grains that left through the open boundary.
    pub exits: u64,
}

impl Avalanche {
    fn record(&mut self, exited: bool) {
        self.size += 1;
        if exited {
            self.exits += 1;
        }
    }
}

/// One-dimensional Oslo pile.
#[derive(Debug, Clone)]
pub struct Lattice<S = RandomThresholds> {
    heights: Vec<u32>,
    gradients: Vec<u32>,
    thresholds: Vec<u32>,
    source: S,
    order: RelaxationOrder,
    grains_added: u64,
    grains_exited: u64,
    pending: Vec<usize>,
}

impl Lattice<RandomThresholds> {
    /// Build an empty pile with thresholds from a seeded generator.
    ///
    /// # Arguments
    /// * `system_size` - Number of sites `L`, at least 1
    /// * `probability` - Probability of drawing threshold 1
    /// * `seed` - Seed for the threshold stream
    ///
    /// # Errors
    /// `InvalidConfiguration` for `L < 1` or `p` outside [0, 1].
    pub fn new(system_size: usize, probability: f64, seed: u64) -> Result<Self> {
        Self::with_source(system_size, RandomThresholds::from_seed(probability, seed)?)
    }
}

impl<S: ThresholdSource> Lattice<S> {
    /// Build an empty pile drawing thresholds from `source`.
    ///
    /// Exactly `system_size` thresholds are drawn, one per site in index
    /// order.
    pub fn with_source(system_size: usize, mut source: S) -> Result<Self> {
        if system_size < 1 {
            return Err(OsloError::invalid("system size must be at least 1"));
        }
        let thresholds = (0..system_size).map(|_| source.next_threshold()).collect();
        Ok(Self {
            heights: vec![0; system_size],
            gradients: vec![0; system_size],
            thresholds,
            source,
            order: RelaxationOrder::default(),
            grains_added: 0,
            grains_exited: 0,
            pending: Vec::new(),
        })
    }

    pub fn with_order(mut self, order: RelaxationOrder) -> Self {
        self.order = order;
        self
    }

    pub fn system_size(&self) -> usize {
        self.heights.len()
    }

    pub fn order(&self) -> RelaxationOrder {
        self.order
    }

    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    pub fn gradients(&self) -> &[u32] {
        &self.gradients
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    /// Height of the pile, measured at site 0.
    pub fn height(&self) -> u32 {
        self.heights[0]
    }

    /// Grains currently on the lattice.
    pub fn total_grains(&self) -> u64 {
        self.heights.iter().map(|&h| u64::from(h)).sum()
    }

    pub fn grains_added(&self) -> u64 {
        self.grains_added
    }

    pub fn grains_exited(&self) -> u64 {
        self.grains_exited
    }

    /// Mean gradient over all sites. The gradients telescope to `h[0]`.
    pub fn mean_gradient(&self) -> f64 {
        f64::from(self.heights[0]) / self.system_size() as f64
    }

    /// Analytic crossover estimate from the current gradient profile.
    pub fn crossover_time_theory(&self) -> f64 {
        crossover_time_theory(self.mean_gradient(), self.system_size())
    }

    /// True when no site exceeds its threshold.
    pub fn is_stable(&self) -> bool {
        self.gradients
            .iter()
            .zip(&self.thresholds)
            .all(|(z, zth)| z <= zth)
    }

    /// True when the stored gradients agree with the stored heights.
    pub fn gradients_match_heights(&self) -> bool {
        let last = self.system_size() - 1;
        (0..=last).all(|i| {
            let right = if i == last { 0 } else { self.heights[i + 1] };
            i64::from(self.gradients[i]) == i64::from(self.heights[i]) - i64::from(right)
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Add one grain at site 0.
    ///
    /// The lattice must be stable before calling.
    pub fn drive(&mut self) {
        debug_assert!(self.is_stable(), "drive called on an unstable lattice");
        self.heights[0] += 1;
        self.gradients[0] += 1;
        self.grains_added += 1;
    }

    /// Topple until stable.
    ///
    /// # Returns
    /// The avalanche: total topples and grains that left the pile
    pub fn relax(&mut self) -> Avalanche {
        match self.order {
            RelaxationOrder::Sweep => self.relax_by_sweeps(),
            RelaxationOrder::Stack => self.relax_by_stack(),
        }
    }

    fn relax_by_sweeps(&mut self) -> Avalanche {
        let mut avalanche = Avalanche::default();
        loop {
            let mut toppled = false;
            for site in 0..self.system_size() {
                if self.gradients[site] > self.thresholds[site] {
                    let exited = self.topple(site);
                    avalanche.record(exited);
                    toppled = true;
                }
            }
            if !toppled {
                return avalanche;
            }
        }
    }

    fn relax_by_stack(&mut self) -> Avalanche {
        let last = self.system_size() - 1;
        let mut avalanche = Avalanche::default();
        let mut pending = std::mem::take(&mut self.pending);
        pending.clear();
        pending.push(0);

        while let Some(site) = pending.pop() {
            if self.gradients[site] <= self.thresholds[site] {
                continue;
            }
            let exited = self.topple(site);
            avalanche.record(exited);

            // The site itself may still exceed its new threshold.
            pending.push(site);
            if site > 0 {
                pending.push(site - 1);
            }
            if site < last {
                pending.push(site + 1);
            }
        }

        self.pending = pending;
        avalanche
    }

    /// Topple `site` once. Returns true if the grain left the pile.
    fn topple(&mut self, site: usize) -> bool {
        let last = self.system_size() - 1;
        self.heights[site] -= 1;

        let exited = if site == last {
            self.gradients[site] -= 1;
            self.grains_exited += 1;
            true
        } else {
            self.gradients[site] -= 2;
            self.heights[site + 1] += 1;
            self.gradients[site + 1] += 1;
            false
        };
        if site > 0 {
            self.gradients[site - 1] += 1;
        }

        self.thresholds[site] = self.source.next_threshold();
        exited
    }
}
