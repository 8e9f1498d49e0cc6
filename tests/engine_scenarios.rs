use std::time::Duration;

use assert_matches::assert_matches;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use typewriter::feedback::{RecordingFeedback, Signal, SilentFeedback};
use typewriter::order::RoundOrder;
use typewriter::timer::{ManualClock, ManualTimer};
use typewriter::{Engine, EnginePhase, KeyOutcome, TransitionSettings};

type TestEngine = Engine<ManualClock, ManualTimer>;

fn engine(texts: &[&str], seed: u64) -> (TestEngine, ManualClock) {
    let clock = ManualClock::default();
    let mut engine = Engine::new(
        clock.clone(),
        ManualTimer::default(),
        StdRng::seed_from_u64(seed),
        TransitionSettings::default(),
    );
    let pool: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
    engine.initialize(&pool);
    (engine, clock)
}

fn finish_current(engine: &mut TestEngine) -> KeyOutcome {
    let text = engine.current_text().unwrap().to_string();
    let mut last = KeyOutcome::Ignored;
    for c in text.chars() {
        last = engine.submit_key(c, &SilentFeedback);
    }
    last
}

#[test]
fn two_short_texts_first_completion() {
    let (mut engine, _) = engine(&["ab", "cd"], 1);

    let outcome = finish_current(&mut engine);

    let entry = assert_matches!(outcome, KeyOutcome::Completed(entry) => entry);
    assert_eq!(entry.text_length, 2);
    assert_eq!(entry.errors, 0);
    assert_eq!(entry.accuracy, 100);
    assert_eq!(engine.phase(), EnginePhase::Transitioning);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn mistake_keeps_cursor_and_is_remembered() {
    let (mut engine, clock) = engine(&["cat"], 1);
    let feedback = RecordingFeedback::default();

    assert_eq!(engine.submit_key('c', &feedback), KeyOutcome::Correct);
    assert_eq!(engine.submit_key('x', &feedback), KeyOutcome::Incorrect);
    assert_eq!(engine.cursor(), 1);
    assert!(engine.error_positions().contains(1));

    assert_eq!(engine.submit_key('a', &feedback), KeyOutcome::Correct);
    clock.advance(Duration::from_secs(2));
    let entry = assert_matches!(engine.submit_key('t', &feedback), KeyOutcome::Completed(e) => e);

    assert_eq!(engine.cursor(), 3);
    assert_eq!(engine.counts().total, 4);
    assert_eq!(engine.counts().correct, 3);
    assert_eq!(entry.errors, 1);
    assert_eq!(entry.accuracy, 75);
    assert_eq!(
        feedback.signals(),
        vec![Signal::Correct, Signal::Incorrect, Signal::Correct, Signal::Correct]
    );
}

#[test]
fn skip_on_last_text_starts_next_round() {
    let (mut engine, _) = engine(&["one text", "two text", "three text"], 4);
    engine.skip_to_next();
    engine.skip_to_next();
    assert_eq!(engine.round_position(), 2);
    assert!(engine.is_round_complete());

    engine.skip_to_next();

    assert_eq!(engine.round_number(), 2);
    assert_eq!(engine.round_position(), 0);
    assert_eq!(engine.round_order().len(), 3);
    assert!(engine.history().is_empty());
}

#[test]
fn reset_mid_round_clears_history() {
    let texts = ["first text", "second text", "third text", "fourth text"];
    let (mut engine, _) = engine(&texts, 9);
    for _ in 0..5 {
        assert_matches!(finish_current(&mut engine), KeyOutcome::Completed(_));
        engine.skip_to_next();
    }
    assert_eq!(engine.history().len(), 5);
    assert_eq!(engine.round_number(), 2);

    engine.reset();

    assert!(engine.history().is_empty());
    assert_eq!(engine.round_number(), 1);
    assert_eq!(engine.round_position(), 0);
    assert_eq!(engine.phase(), EnginePhase::Active);
}

#[test]
fn stale_timer_after_skip_does_not_advance() {
    let (mut engine, _) = engine(&["first text", "second text", "third text"], 2);
    finish_current(&mut engine);
    let token = engine.pending_transition().unwrap();

    engine.skip_to_next();
    assert_eq!(engine.round_position(), 1);
    assert!(engine.timer().cancelled.contains(&token));

    assert!(!engine.on_timer_fired(token));
    assert_eq!(engine.round_position(), 1);
}

#[test]
fn every_text_once_per_round() {
    let texts = ["a text", "b text", "c text", "d text", "e text"];
    let (mut engine, _) = engine(&texts, 21);

    for round in 1..=3u32 {
        let mut seen = Vec::new();
        for _ in 0..texts.len() {
            assert_eq!(engine.round_number(), round);
            seen.push(engine.current_text_index().unwrap());
            finish_current(&mut engine);
            let token = engine.pending_transition().unwrap();
            assert!(engine.on_timer_fired(token));
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }
}

proptest! {
    #[test]
    fn round_order_is_permutation(len in 0usize..64, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let order = RoundOrder::shuffled(len, &mut rng);

        let mut sorted = order.as_slice().to_vec();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn cursor_never_moves_back(keys in proptest::collection::vec(prop::sample::select(vec!['a', 'b', 'c', ' ', 'x']), 0..40)) {
        let (mut engine, _) = engine(&["abc cab bca"], 0);
        let mut last_cursor = 0;
        let mut last_errors = 0;

        for key in keys {
            engine.submit_key(key, &SilentFeedback);
            prop_assert!(engine.cursor() >= last_cursor);
            if engine.phase() == EnginePhase::Active {
                prop_assert!(engine.error_positions().len() >= last_errors);
                last_errors = engine.error_positions().len();
            }
            last_cursor = engine.cursor();
        }
    }
}
