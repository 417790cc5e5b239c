//! Independent runs across system sizes and repeats.
//!
//! Jobs share nothing, so they run on the rayon pool. Each job gets its own
//! ChaCha stream: the batch seed picks the key and the job index picks the
//! stream, which keeps jobs independent and the whole batch reproducible.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::{OsloError, Result};
use crate::simulation::{RunOutput, Simulation};

/// One cell of a batch: a system size and a repeat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    pub index: usize,
    pub system_size: usize,
    pub repeat: usize,
}

/// A finished job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRun {
    pub job: BatchJob,
    pub output: RunOutput,
}

/// Generator for job `index` of a batch seeded with `seed`.
pub fn job_rng(seed: u64, index: usize) -> ChaChaRng {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

/// Lay out jobs size-major: every repeat of the first size, then the next.
pub fn plan_jobs(system_sizes: &[usize], repeats: usize) -> Vec<BatchJob> {
    system_sizes
        .iter()
        .flat_map(|&system_size| (0..repeats).map(move |repeat| (system_size, repeat)))
        .enumerate()
        .map(|(index, (system_size, repeat))| BatchJob {
            index,
            system_size,
            repeat,
        })
        .collect()
}

/// Run `repeats` independent simulations for every size in `system_sizes`.
///
/// Every job uses `template` with its system size replaced. Results come
/// back in the order of [`plan_jobs`].
///
/// # Errors
/// * `InvalidConfiguration` if there are no sizes, `repeats` is zero, or
///   any resulting configuration is invalid
/// * The first error of any job, e.g. `CrossoverNotReached` from a capped
///   crossover-relative policy
pub fn run_batch(
    system_sizes: &[usize],
    repeats: usize,
    template: &SimulationConfig,
    seed: u64,
) -> Result<Vec<BatchRun>> {
    if system_sizes.is_empty() {
        return Err(OsloError::invalid("batch needs at least one system size"));
    }
    if repeats == 0 {
        return Err(OsloError::invalid("batch repeat count must be positive"));
    }

    let jobs = plan_jobs(system_sizes, repeats);
    for job in &jobs {
        SimulationConfig {
            system_size: job.system_size,
            ..*template
        }
        .validate()?;
    }

    jobs.into_par_iter()
        .map(|job| -> Result<BatchRun> {
            let config = SimulationConfig {
                system_size: job.system_size,
                ..*template
            };
            debug!(
                index = job.index,
                system_size = job.system_size,
                repeat = job.repeat,
                "batch job started"
            );
            let output = Simulation::with_rng(config, job_rng(seed, job.index))?.run()?;
            debug!(index = job.index, steps = output.steps, "batch job finished");
            Ok(BatchRun { job, output })
        })
        .collect()
}

/// Outputs of every repeat for one system size, in repeat order.
pub fn runs_for_size(runs: &[BatchRun], system_size: usize) -> Vec<&RunOutput> {
    runs.iter()
        .filter(|run| run.job.system_size == system_size)
        .map(|run| &run.output)
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::config::StopPolicy;

    #[test]
    fn jobs_are_size_major() {
        let jobs = plan_jobs(&[4, 8], 3);

        assert_eq!(jobs.len(), 6);
        assert_eq!(
            jobs.iter()
                .map(|j| (j.system_size, j.repeat))
                .collect::<Vec<_>>(),
            vec![(4, 0), (4, 1), (4, 2), (8, 0), (8, 1), (8, 2)]
        );
        assert!(jobs.iter().enumerate().all(|(i, j)| j.index == i));
    }

    #[test]
    fn job_streams_differ() {
        let a = job_rng(7, 0).next_u64();
        let b = job_rng(7, 1).next_u64();
        let again = job_rng(7, 0).next_u64();

        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn empty_batches_are_rejected() {
        let template = SimulationConfig::default();
        assert!(run_batch(&[], 1, &template, 0).is_err());
        assert!(run_batch(&[8], 0, &template, 0).is_err());
        assert!(run_batch(&[8, 0], 1, &template, 0).is_err());
    }

    #[test]
    fn batch_returns_one_output_per_job() {
        let template = SimulationConfig::default().with_stop(StopPolicy::Steps(500));
        let runs = run_batch(&[4, 8], 2, &template, 11).unwrap();

        assert_eq!(runs.len(), 4);
        for run in &runs {
            assert_eq!(run.output.system_size, run.job.system_size);
            assert_eq!(run.output.steps, 500);
            assert!(run.output.crossover_time.is_some());
        }
        assert_eq!(runs_for_size(&runs, 8).len(), 2);
    }

    #[test]
    fn batch_is_reproducible() {
        let template = SimulationConfig::default().with_stop(StopPolicy::Steps(300));
        let first = run_batch(&[6], 3, &template, 99).unwrap();
        let second = run_batch(&[6], 3, &template, 99).unwrap();

        assert_eq!(first, second);
        // Independent streams give different repeats.
        assert_ne!(
            first[0].output.avalanche_sizes().unwrap(),
            first[1].output.avalanche_sizes().unwrap()
        );
    }
}
