use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::error::OsloError;
use crate::threshold::{
    HIGH_THRESHOLD, LOW_THRESHOLD, RandomThresholds, RecordingThresholds, ScriptedThresholds,
    ThresholdSource, draw_threshold,
};

#[test]
fn draws_are_always_one_or_two() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    for p in [0.0, 0.3, 0.5, 0.9, 1.0] {
        for _ in 0..1000 {
            let z = draw_threshold(&mut rng, p);
            assert!(z == LOW_THRESHOLD || z == HIGH_THRESHOLD, "got {z}");
        }
    }
}

#[test]
fn extreme_probabilities_are_deterministic() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    assert!((0..1000).all(|_| draw_threshold(&mut rng, 1.0) == LOW_THRESHOLD));
    assert!((0..1000).all(|_| draw_threshold(&mut rng, 0.0) == HIGH_THRESHOLD));
}

#[test]
fn low_threshold_frequency_matches_probability() {
    let mut source = RandomThresholds::from_seed(0.3, 42).unwrap();

    let n = 20_000;
    let lows = (0..n)
        .filter(|_| source.next_threshold() == LOW_THRESHOLD)
        .count();
    let frequency = lows as f64 / n as f64;

    assert!(
        (frequency - 0.3).abs() < 0.02,
        "Frequency {} should be close to 0.3",
        frequency
    );
}

#[test]
fn same_seed_gives_same_stream() {
    let mut a = RandomThresholds::from_seed(0.5, 7).unwrap();
    let mut b = RandomThresholds::from_seed(0.5, 7).unwrap();

    let draws_a: Vec<u32> = (0..200).map(|_| a.next_threshold()).collect();
    let draws_b: Vec<u32> = (0..200).map(|_| b.next_threshold()).collect();

    assert_eq!(draws_a, draws_b);
}

#[test]
fn invalid_probability_is_rejected() {
    for p in [-0.01, 1.01, f64::NAN] {
        let err = RandomThresholds::from_seed(p, 0).unwrap_err();
        assert!(matches!(err, OsloError::InvalidConfiguration { .. }));
    }
}

#[test]
fn scripted_thresholds_replay_and_wrap() {
    let mut source = ScriptedThresholds::new(vec![1, 2, 2]).unwrap();

    let draws: Vec<u32> = (0..7).map(|_| source.next_threshold()).collect();

    assert_eq!(draws, vec![1, 2, 2, 1, 2, 2, 1]);
    assert_eq!(source.consumed(), 7);
    assert!(source.has_wrapped());
}

#[test]
fn scripted_thresholds_report_running_past_the_end() {
    let mut source = ScriptedThresholds::new(vec![2, 1, 1]).unwrap();
    assert_eq!(source.len(), 3);

    for _ in 0..3 {
        source.next_threshold();
    }
    assert!(!source.has_wrapped(), "a full pass is not a wrap");

    source.next_threshold();
    assert!(source.has_wrapped());
}

#[test]
fn sources_report_their_probability() {
    let random = RandomThresholds::from_seed(0.3, 1).unwrap();
    assert_eq!(random.probability(), Some(0.3));

    let recording = RecordingThresholds::new(random);
    assert_eq!(recording.probability(), Some(0.3));

    let scripted = ScriptedThresholds::new(vec![1]).unwrap();
    assert_eq!(scripted.probability(), None);
}

#[test]
fn scripted_thresholds_reject_bad_values() {
    assert!(ScriptedThresholds::new(vec![]).is_err());
    assert!(ScriptedThresholds::new(vec![1, 3]).is_err());
    assert!(ScriptedThresholds::new(vec![0]).is_err());
}

#[test]
fn recording_keeps_every_draw() {
    let mut source = RecordingThresholds::new(RandomThresholds::from_seed(0.5, 3).unwrap());

    let passed: Vec<u32> = (0..50).map(|_| source.next_threshold()).collect();

    assert_eq!(source.draws(), passed.as_slice());
    assert_eq!(source.into_draws(), passed);
}

#[test]
fn borrowed_sources_advance_the_owner() {
    fn first_draw<S: ThresholdSource>(mut source: S) -> u32 {
        source.next_threshold()
    }

    let mut scripted = ScriptedThresholds::new(vec![2, 1]).unwrap();

    assert_eq!(first_draw(&mut scripted), 2);
    assert_eq!(scripted.next_threshold(), 1);
}
