//! Tests for the drive/relax loop.

use approx::assert_relative_eq;

use crate::config::{SimulationConfig, StopPolicy};
use crate::error::OsloError;
use crate::lattice::RelaxationOrder;
use crate::recorder::Recording;
use crate::simulation::{RunPhase, Simulation, run_simulation};
use crate::threshold::ScriptedThresholds;

fn fixed(system_size: usize, probability: f64, steps: u64) -> SimulationConfig {
    SimulationConfig::new(system_size)
        .with_probability(probability)
        .with_stop(StopPolicy::Steps(steps))
}

#[test]
fn invalid_config_fails_before_running() {
    assert!(Simulation::new(SimulationConfig::new(0), 0).is_err());
    assert!(Simulation::new(fixed(8, 2.0, 10), 0).is_err());
    assert!(Simulation::new(fixed(8, 0.5, 0), 0).is_err());
}

#[test]
fn step_advances_count_and_records_one_sample() {
    let mut sim = Simulation::new(fixed(8, 0.5, 10), 42).unwrap();

    let avalanche = sim.step();

    assert_eq!(sim.count(), 1);
    assert_eq!(sim.state().last_avalanche_size, avalanche.size);
    assert_eq!(sim.recorder().len(), 1);
    assert_eq!(sim.recorder().full_series().unwrap().0, &[1]);
}

#[test]
fn fixed_run_executes_exactly_n_steps() {
    let output = run_simulation(fixed(8, 0.5, 750), 3).unwrap();

    assert_eq!(output.steps, 750);
    assert_eq!(output.heights().unwrap().len(), 750);
    assert_eq!(output.avalanche_sizes().unwrap().len(), 750);
}

#[test]
fn single_site_crossover_is_step_one() {
    let output = run_simulation(fixed(1, 1.0, 5), 0).unwrap();

    assert_eq!(output.crossover_time, Some(1));
    assert_eq!(output.avalanche_sizes().unwrap(), &[0, 1, 1, 1, 1]);
    assert_eq!(output.heights().unwrap(), &[1, 1, 1, 1, 1]);
}

#[test]
fn four_site_deterministic_run() {
    let output = run_simulation(fixed(4, 1.0, 30), 0).unwrap();

    assert_eq!(output.crossover_time, Some(10));

    let sizes = output.avalanche_sizes().unwrap();
    assert_eq!(&sizes[..10], &[0, 1, 0, 2, 1, 0, 3, 2, 1, 0]);
    assert!(sizes[10..].iter().all(|&s| s == 4));

    assert_eq!(output.recurrent_heights().unwrap(), &[4; 20]);
    assert_relative_eq!(output.mean_recurrent_height().unwrap(), 4.0);
    assert_relative_eq!(output.crossover_time_theory, 10.0);
    assert_eq!(output.max_avalanche_size(), Some(4));
}

#[test]
fn run_without_crossover_keeps_full_series() {
    // A threshold-2 pile of 10 sites holds 110 grains.
    let output = run_simulation(fixed(10, 0.0, 50), 0).unwrap();

    assert_eq!(output.crossover_time, None);
    assert_eq!(output.heights().unwrap().len(), 50);
    assert_eq!(
        output.recurrent_heights().unwrap_err(),
        OsloError::CrossoverNotReached { steps: 50 }
    );
    assert!(output.require_crossover().is_err());
}

#[test]
fn crossover_relative_run_records_k_recurrent_samples() {
    let config = SimulationConfig::new(16).with_stop(StopPolicy::after_crossover(250));
    let output = run_simulation(config, 8).unwrap();

    let t_c = output.require_crossover().unwrap();
    assert_eq!(output.steps, t_c + 250);
    assert_eq!(output.recurrent_avalanche_sizes().unwrap().len(), 250);
}

#[test]
fn capped_crossover_run_fails_when_cap_is_hit() {
    let config = SimulationConfig::new(10)
        .with_probability(0.0)
        .with_stop(StopPolicy::AfterCrossover {
            extension: 10,
            max_steps: Some(100),
        });

    let err = run_simulation(config, 0).unwrap_err();
    assert_eq!(err, OsloError::CrossoverNotReached { steps: 100 });
}

#[test]
fn crossover_time_never_changes_once_set() {
    let mut sim = Simulation::new(fixed(8, 0.5, 2_000), 17).unwrap();
    let mut seen = None;

    while !sim.is_finished() {
        sim.step();
        match (seen, sim.crossover_time()) {
            (None, now) => seen = now,
            (Some(t), now) => assert_eq!(now, Some(t)),
        }
    }
    assert!(seen.is_some());
}

#[test]
fn crossover_step_is_first_with_an_exit() {
    let mut sim = Simulation::new(fixed(12, 0.5, 1_000), 5).unwrap();
    let mut first_exit = None;

    while !sim.is_finished() {
        let step = sim.count();
        let avalanche = sim.step();
        if avalanche.exits > 0 && first_exit.is_none() {
            first_exit = Some(step);
        }
    }
    assert_eq!(sim.crossover_time(), first_exit);
}

#[test]
fn run_after_manual_steps_adds_nothing() {
    let mut sim = Simulation::new(fixed(4, 0.5, 3), 0).unwrap();
    assert_eq!(sim.state().phase, RunPhase::Running);
    while !sim.is_finished() {
        sim.step();
    }
    let output = sim.run().unwrap();
    assert_eq!(output.steps, 3);
}

#[test]
fn same_seed_same_histories() {
    let a = run_simulation(fixed(16, 0.5, 2_000), 1234).unwrap();
    let b = run_simulation(fixed(16, 0.5, 2_000), 1234).unwrap();
    let c = run_simulation(fixed(16, 0.5, 2_000), 4321).unwrap();

    assert_eq!(a.heights().unwrap(), b.heights().unwrap());
    assert_eq!(a.avalanche_sizes().unwrap(), b.avalanche_sizes().unwrap());
    assert_ne!(a.avalanche_sizes().unwrap(), c.avalanche_sizes().unwrap());
}

#[test]
fn scripted_source_drives_the_run() {
    let all_ones = ScriptedThresholds::new(vec![1]).unwrap();
    let output = Simulation::with_source(fixed(4, 1.0, 15), all_ones)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(output.crossover_time, Some(10));
    // The script, not the configured p, decided the draws.
    assert_eq!(output.probability, None);
}

#[test]
fn seeded_run_reports_its_probability() {
    let output = run_simulation(fixed(8, 0.25, 10), 0).unwrap();
    assert_eq!(output.probability, Some(0.25));
}

#[test]
fn recurrent_only_recording_matches_full_recording() {
    let full = run_simulation(fixed(16, 0.5, 3_000), 21).unwrap();
    let streamed = run_simulation(
        fixed(16, 0.5, 3_000).with_recording(Recording::RecurrentOnly),
        21,
    )
    .unwrap();

    assert_eq!(full.crossover_time, streamed.crossover_time);
    assert_eq!(
        full.recurrent_heights().unwrap(),
        streamed.recurrent_heights().unwrap()
    );
    assert_eq!(
        full.recurrent_avalanche_sizes().unwrap(),
        streamed.recurrent_avalanche_sizes().unwrap()
    );
    assert!(matches!(
        streamed.heights().unwrap_err(),
        OsloError::HistoryDiscarded { .. }
    ));
}

#[test]
fn stack_relaxation_reaches_same_deterministic_crossover() {
    let output = run_simulation(
        fixed(6, 1.0, 40).with_relaxation(RelaxationOrder::Stack),
        0,
    )
    .unwrap();

    assert_eq!(output.crossover_time, Some(21));
}
