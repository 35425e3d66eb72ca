//! End-to-end session tests driven on a synthetic wall clock.
//!
//! Every test feeds `tick_at` explicit epoch milliseconds in 100 ms steps,
//! the same cadence a host tick loop uses, and observes the count/rep/rest
//! sequence through events and a recording sink.

use std::sync::{Arc, Mutex};

use sixcount_core::{
    AudioSink, ClipSegment, CueDispatcher, CueStyle, Event, Mode, Phase, RestKind, SetsConfig,
    SpeakOptions, StopReason, WorkoutConfig, WorkoutSession,
};

/// Sink that records every cue-level effect, shareable with the test body.
#[derive(Default)]
struct Recorder {
    tones: Vec<(f32, u64)>,
    spoken: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedRecorder(Arc<Mutex<Recorder>>);

impl AudioSink for SharedRecorder {
    fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64) {
        self.0.lock().unwrap().tones.push((frequency_hz, duration_ms));
    }
    fn speak(&mut self, text: &str, _options: SpeakOptions) {
        self.0.lock().unwrap().spoken.push(text.to_string());
    }
    fn play_clip(&mut self, _segment: &ClipSegment) -> bool {
        false
    }
}

fn voice_session(config: WorkoutConfig) -> (WorkoutSession, SharedRecorder) {
    let recorder = SharedRecorder::default();
    let dispatcher = CueDispatcher::new(CueStyle::Voice, Box::new(recorder.clone()));
    (WorkoutSession::new(config, dispatcher).unwrap(), recorder)
}

fn tone_session(config: WorkoutConfig) -> (WorkoutSession, SharedRecorder) {
    let recorder = SharedRecorder::default();
    let dispatcher = CueDispatcher::new(CueStyle::Tone, Box::new(recorder.clone()));
    (WorkoutSession::new(config, dispatcher).unwrap(), recorder)
}

/// Drive the session from `from` to `to` epoch ms in 100 ms steps,
/// collecting every event.
fn drive(session: &mut WorkoutSession, from: u64, to: u64) -> Vec<Event> {
    let mut events = Vec::new();
    let mut now = from;
    while now <= to {
        events.extend(session.tick_at(now));
        now += 100;
    }
    events
}

fn counts_of(events: &[Event]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::CountAdvanced { count, .. } => Some(*count),
            _ => None,
        })
        .collect()
}

fn completed_reps_of(events: &[Event]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::RepCompleted { rep, .. } => Some(*rep),
            _ => None,
        })
        .collect()
}

#[test]
fn continuous_session_counts_cycle_exactly() {
    // 3 reps, generous budget so time never expires first.
    let config = WorkoutConfig {
        duration_minutes: 5.0,
        target_reps: 3,
        ..WorkoutConfig::default()
    };
    let (mut session, _) = tone_session(config);
    session.start_workout_at(0).unwrap();

    let events = drive(&mut session, 0, 300_000);

    // The observed count sequence is 1..6 repeated exactly 3 times.
    let expected: Vec<u32> = (0..3).flat_map(|_| 1..=6u32).collect();
    assert_eq!(counts_of(&events), expected);

    // One rep completion per 6-count cycle, reaching the target exactly.
    assert_eq!(completed_reps_of(&events), vec![1, 2, 3]);
    assert_eq!(session.current_rep(), 3);
    assert_eq!(session.phase(), Phase::Stopped);

    // Session ended because the reps ran out, not the clock.
    let reasons: Vec<StopReason> = events
        .iter()
        .filter_map(|e| match e {
            Event::WorkoutCompleted { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(reasons, vec![StopReason::TargetReached]);
}

#[test]
fn rep_never_exceeds_target_even_with_extra_ticks() {
    // 30 s budget for 2 reps: 11.1 s rest after rep 1, done around 23 s.
    let config = WorkoutConfig {
        duration_minutes: 0.5,
        target_reps: 2,
        ..WorkoutConfig::default()
    };
    let (mut session, _) = tone_session(config);
    session.start_workout_at(0).unwrap();
    drive(&mut session, 0, 60_000);
    assert_eq!(session.current_rep(), 2);
    // Long after stop, nothing moves.
    drive(&mut session, 60_000, 120_000);
    assert_eq!(session.current_rep(), 2);
}

#[test]
fn continuous_session_rests_between_reps() {
    // 1 min / 10 reps / default pace: 2.1 s rest after each rep.
    let config = WorkoutConfig::default();
    let (mut session, _) = tone_session(config);
    assert!((session.plan().rest_between_reps_seconds - 2.1).abs() < 1e-9);

    session.start_workout_at(0).unwrap();
    let events = drive(&mut session, 0, 12_000);

    let rests: Vec<(RestKind, f64)> = events
        .iter()
        .filter_map(|e| match e {
            Event::RestStarted { kind, seconds, .. } => Some((*kind, *seconds)),
            _ => None,
        })
        .collect();
    assert!(!rests.is_empty());
    assert!(rests
        .iter()
        .all(|(kind, secs)| *kind == RestKind::BetweenReps && (*secs - 2.1).abs() < 1e-9));

    // Rest ends and counting resumes without another WorkoutBegan.
    let began = events
        .iter()
        .filter(|e| matches!(e, Event::WorkoutBegan { .. }))
        .count();
    assert_eq!(began, 1);
    assert!(events.iter().any(|e| matches!(e, Event::RestEnded { .. })));
}

#[test]
fn last_count_announces_upcoming_rep_number() {
    let config = WorkoutConfig {
        duration_minutes: 0.5,
        target_reps: 2,
        ..WorkoutConfig::default()
    };
    let (mut session, recorder) = voice_session(config);
    session.start_workout_at(0).unwrap();
    drive(&mut session, 0, 60_000);

    let spoken = recorder.0.lock().unwrap().spoken.clone();
    // Counts 1-5 speak words, the sixth count speaks the rep number.
    assert!(spoken.contains(&"One".to_string()));
    assert!(spoken.contains(&"Five".to_string()));
    assert!(spoken.contains(&"1".to_string()));
    assert!(spoken.contains(&"2".to_string()));
    assert!(!spoken.contains(&"Six".to_string()));
    assert_eq!(spoken.last().unwrap(), "Workout complete!");
}

#[test]
fn sets_mode_inserts_set_rest_and_advances_set() {
    // 10 min, 100 reps, 5 sets of 20, 30 s set rest.
    let config = WorkoutConfig {
        duration_minutes: 10.0,
        target_reps: 100,
        mode: Mode::Sets(SetsConfig {
            sets: 5,
            reps_per_set: 20,
            rest_between_sets_seconds: 30.0,
        }),
        ..WorkoutConfig::default()
    };
    let (mut session, _) = tone_session(config);
    assert!((session.plan().seconds_per_rep - 4.8).abs() < 1e-9);
    assert!((session.plan().rest_between_reps_seconds - 0.9).abs() < 1e-9);

    session.start_workout_at(0).unwrap();

    // Run until the 20th rep completes.
    let mut events = Vec::new();
    let mut now = 0;
    while session.current_rep() < 20 && now < 300_000 {
        events.extend(session.tick_at(now));
        now += 100;
    }
    assert_eq!(session.current_rep(), 20);
    assert_eq!(session.phase(), Phase::RestingBetweenSets);
    assert_eq!(session.current_set(), 2);

    let set_rests: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            Event::RestStarted {
                kind: RestKind::BetweenSets,
                seconds,
                ..
            } => Some(*seconds),
            _ => None,
        })
        .collect();
    assert_eq!(set_rests, vec![30.0]);

    // Rest countdown shows whole seconds and reaches zero ~30 s later.
    assert_eq!(session.rest_remaining_seconds_at(now), 30);
    let resumed_at = now + 30_000;
    drive(&mut session, now, resumed_at + 200);
    assert_eq!(session.phase(), Phase::Active);
}

#[test]
fn zero_rest_runs_reps_back_to_back() {
    // Pace slower than the cadence allows: rest clamps to zero.
    let config = WorkoutConfig {
        duration_minutes: 0.5,
        target_reps: 20,
        ..WorkoutConfig::default()
    };
    let (mut session, _) = tone_session(config);
    assert_eq!(session.plan().rest_between_reps_seconds, 0.0);

    session.start_workout_at(0).unwrap();
    // The 30 s budget runs from "go", so it expires 35 s after start.
    let events = drive(&mut session, 0, 35_000);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::RestStarted { .. })));
    // Degraded mode: the session simply stops when the budget expires.
    assert_eq!(session.phase(), Phase::Stopped);
}

#[test]
fn pre_roll_countdown_is_not_charged_against_the_duration() {
    // 3 s budget, shorter than the 5 s pre-roll: counting must still start.
    let config = WorkoutConfig {
        duration_minutes: 0.05,
        target_reps: 100,
        ..WorkoutConfig::default()
    };
    let (mut session, _) = tone_session(config);
    session.start_workout_at(0).unwrap();

    let events = drive(&mut session, 0, 15_000);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::WorkoutBegan { .. })));
    assert!(!counts_of(&events).is_empty());

    // The budget runs from "go": the 3 s expire 8 s after start, with
    // active elapsed time exactly equal to the budget.
    let completion = events.iter().find_map(|e| match e {
        Event::WorkoutCompleted {
            reason, elapsed_ms, ..
        } => Some((*reason, *elapsed_ms)),
        _ => None,
    });
    assert_eq!(completion, Some((StopReason::TimeExpired, 3_000)));
}

#[test]
fn pause_shifts_the_whole_timeline_without_replaying_cues() {
    let config = WorkoutConfig {
        duration_minutes: 5.0,
        target_reps: 4,
        ..WorkoutConfig::default()
    };

    // Reference run without a pause.
    let (mut reference, _) = tone_session(config);
    reference.start_workout_at(0).unwrap();
    let reference_events = drive(&mut reference, 0, 120_000);

    // Paused run: 10 s pause in the middle of the first rep.
    let (mut paused, _) = tone_session(config);
    paused.start_workout_at(0).unwrap();
    let mut events = drive(&mut paused, 0, 6_000);
    paused.pause_workout_at(6_050).unwrap();
    // Wall clock advances 10 s; ticks fire but nothing happens.
    for now in (6_100..16_100).step_by(100) {
        assert!(paused.tick_at(now).is_empty());
    }
    paused.resume_workout_at(16_050).unwrap();
    events.extend(drive(&mut paused, 16_100, 130_000));

    // Identical cue/event sequence, pause or no pause.
    assert_eq!(counts_of(&events), counts_of(&reference_events));
    assert_eq!(
        completed_reps_of(&events),
        completed_reps_of(&reference_events)
    );
}

#[test]
fn pause_round_trip_elapsed_within_one_tick() {
    let (mut session, _) = tone_session(WorkoutConfig {
        duration_minutes: 5.0,
        ..WorkoutConfig::default()
    });
    session.start_workout_at(0).unwrap();
    drive(&mut session, 0, 8_000);

    session.pause_workout_at(8_000).unwrap();
    session.resume_workout_at(23_000).unwrap();
    drive(&mut session, 23_000, 30_000);

    // 30 s wall clock minus the 5 s pre-roll and the 15 s pause.
    let elapsed = session.elapsed_ms_at(30_000);
    assert!(
        (elapsed as i64 - 10_000).abs() <= 100,
        "elapsed {elapsed} not within one tick of 10000"
    );
    assert_eq!(session.paused_accumulated_ms_at(30_000), 15_000);
}

#[test]
fn duration_and_target_racing_produce_one_completion() {
    // Tuned so the final count of the final rep lands on the exact tick
    // the budget expires: 1.2 s of active time, counts every 0.1 s, the
    // twelfth count deadline and the expiry both at elapsed 1200 ms.
    let config = WorkoutConfig {
        duration_minutes: 0.02,
        target_reps: 2,
        custom_pace_seconds: Some(0.1),
        ..WorkoutConfig::default()
    };
    let (mut session, recorder) = tone_session(config);
    assert_eq!(session.plan().rest_between_reps_seconds, 0.0);
    session.start_workout_at(0).unwrap();

    let events = drive(&mut session, 0, 10_000);
    let completions = events
        .iter()
        .filter(|e| matches!(e, Event::WorkoutCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
    assert_eq!(session.phase(), Phase::Stopped);

    // Exactly one completion tone pair.
    let tones = recorder.0.lock().unwrap().tones.clone();
    let high_notes = tones.iter().filter(|(hz, _)| *hz == 1760.0).count();
    assert_eq!(high_notes, 1);
}

#[test]
fn snapshot_reflects_live_state() {
    let (mut session, _) = tone_session(WorkoutConfig::default());
    session.start_workout_at(0).unwrap();
    drive(&mut session, 0, 7_000);

    match session.snapshot_at(7_000) {
        Event::StateSnapshot {
            phase,
            elapsed_ms,
            paused,
            ..
        } => {
            assert_ne!(phase, Phase::Idle);
            // 7 s of wall clock, 5 s of which was the pre-roll.
            assert_eq!(elapsed_ms, 2_000);
            assert!(!paused);
        }
        other => panic!("expected StateSnapshot, got {other:?}"),
    }
}
