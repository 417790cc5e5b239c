//! Main simulation driver.
//!
//! Owns the lattice, run state and recorder of one run and steps them in
//! the order described in the module docs.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::{debug, info, warn};

use super::{RunOutput, RunPhase, RunState};
use crate::config::{SimulationConfig, StopPolicy};
use crate::error::{OsloError, Result};
use crate::lattice::{Avalanche, Lattice};
use crate::recorder::{Recorder, Recording};
use crate::threshold::{RandomThresholds, ThresholdSource};

/// Upper bound on samples reserved up front for a fixed-length run.
const MAX_PREALLOCATED_STEPS: u64 = 1 << 24;

/// A single run of the Oslo model.
#[derive(Debug, Clone)]
pub struct Simulation<S = RandomThresholds> {
    config: SimulationConfig,
    lattice: Lattice<S>,
    state: RunState,
    recorder: Recorder,
}

impl Simulation<RandomThresholds> {
    /// Create a run whose thresholds come from a ChaCha stream seeded with
    /// `seed`.
    ///
    /// # Example
    /// ```rust
    /// use oslo::{Simulation, SimulationConfig, StopPolicy};
    ///
    /// let config = SimulationConfig::new(16).with_stop(StopPolicy::Steps(1_000));
    /// let output = Simulation::new(config, 42)?.run()?;
    ///
    /// assert_eq!(output.steps, 1_000);
    /// assert!(output.crossover_time.is_some());
    /// # Ok::<(), oslo::OsloError>(())
    /// ```
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, ChaChaRng::seed_from_u64(seed))
    }

    /// Create a run drawing thresholds from an existing generator.
    pub fn with_rng(config: SimulationConfig, rng: ChaChaRng) -> Result<Self> {
        config.validate()?;
        let source = RandomThresholds::new(config.probability, rng)?;
        Self::with_source(config, source)
    }
}

impl<S: ThresholdSource> Simulation<S> {
    /// Create a run drawing thresholds from `source`.
    ///
    /// The source decides the draws, so `config.probability` is only
    /// checked for range here. The output reports the source's own
    /// probability instead.
    pub fn with_source(config: SimulationConfig, source: S) -> Result<Self> {
        config.validate()?;
        let lattice =
            Lattice::with_source(config.system_size, source)?.with_order(config.relaxation);

        let recorder = match (config.recording, config.stop.planned_steps()) {
            (Recording::Full, Some(steps)) => {
                let capacity = steps.min(MAX_PREALLOCATED_STEPS) as usize;
                Recorder::with_capacity(config.recording, capacity)
            }
            _ => Recorder::new(config.recording),
        };

        debug!(
            system_size = config.system_size,
            probability = ?lattice.source().probability(),
            stop = ?config.stop,
            relaxation = ?config.relaxation,
            "oslo run configured"
        );

        Ok(Self {
            config,
            lattice,
            state: RunState::new(),
            recorder,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice<S> {
        &self.lattice
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn count(&self) -> u64 {
        self.state.count
    }

    pub fn crossover_time(&self) -> Option<u64> {
        self.state.crossover_time()
    }

    /// Execute one drive/relax step.
    ///
    /// # Returns
    /// The avalanche triggered by the new grain
    pub fn step(&mut self) -> Avalanche {
        self.lattice.drive();
        let avalanche = self.lattice.relax();

        let step = self.state.count;
        if self.state.crossover.observe(step, &avalanche) {
            debug!(
                system_size = self.config.system_size,
                crossover_time = step,
                "crossover reached"
            );
            self.recorder.mark_crossover(step);
        }

        self.state.count += 1;
        self.state.last_avalanche_size = avalanche.size;
        self.recorder.append(self.lattice.height(), avalanche.size);

        avalanche
    }

    /// Check the stop policy against the current state.
    pub fn is_finished(&self) -> bool {
        self.config
            .stop
            .should_stop(self.state.count, self.state.crossover_time())
    }

    /// Step until the stop policy is satisfied.
    ///
    /// # Errors
    /// `CrossoverNotReached` when a capped crossover-relative run hits its
    /// cap. A fixed-length run without crossover still succeeds; its
    /// recurrent-phase accessors report the error instead.
    pub fn run(mut self) -> Result<RunOutput> {
        while !self.is_finished() {
            self.step();
        }
        self.state.phase = RunPhase::Stopped;

        let steps = self.state.count;
        match (self.config.stop, self.state.crossover_time()) {
            (StopPolicy::AfterCrossover { .. }, None) => {
                warn!(
                    system_size = self.config.system_size,
                    steps, "step cap reached before crossover"
                );
                return Err(OsloError::CrossoverNotReached { steps });
            }
            (StopPolicy::Steps(_), None) => {
                warn!(
                    system_size = self.config.system_size,
                    steps, "run finished without reaching crossover"
                );
            }
            _ => {}
        }

        let output = self.finish();
        info!(
            system_size = output.system_size,
            steps = output.steps,
            crossover_time = ?output.crossover_time,
            crossover_time_theory = output.crossover_time_theory,
            "oslo run complete"
        );
        Ok(output)
    }

    /// Stop wherever the run currently is and package its output.
    pub fn finish(self) -> RunOutput {
        RunOutput::new(
            self.config.system_size,
            self.lattice.source().probability(),
            self.state.crossover_time(),
            self.lattice.crossover_time_theory(),
            self.recorder,
        )
    }
}

/// Run a seeded simulation to completion.
///
/// # Arguments
/// * `config` - Run parameters
/// * `seed` - Seed for the threshold stream
pub fn run_simulation(config: SimulationConfig, seed: u64) -> Result<RunOutput> {
    Simulation::new(config, seed)?.run()
}
