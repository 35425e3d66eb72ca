//! Workout session state machine.
//!
//! The session is a wall-clock-based state machine in the same mold as a
//! tick-driven timer engine: it owns no threads and arms no OS timers. The
//! host calls `tick()` periodically (every ~100 ms) and the session compares
//! the pause-adjusted elapsed time against a single [`Deadlines`] struct to
//! decide which transition, if any, fires. `stop_workout()` clears every
//! deadline in one pass, so no stale callback can mutate state after stop.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> CountingDown -> Active <-> (RestingBetweenReps | RestingBetweenSets)
//!                           |
//!                           v
//!                        Stopped   (target reached, time expired, or manual)
//! ```
//!
//! All deadlines live in the elapsed-time domain produced by
//! [`SessionClock`]: milliseconds since start, excluding paused intervals.
//! Pausing therefore freezes the whole timeline in place, and resuming
//! continues from the next tick boundary -- cues missed during a pause are
//! never replayed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{now_ms, SessionClock};
use crate::config::{Mode, WorkoutConfig};
use crate::cue::{Cue, CueDispatcher};
use crate::error::CoreError;
use crate::events::{Event, RestKind, StopReason};
use crate::pacing::{compute_pacing, PacingPlan};

/// Length of the pre-roll countdown, in whole seconds.
pub const COUNTDOWN_SECONDS: u32 = 5;
/// Spacing of countdown ticks.
const COUNTDOWN_STEP_MS: u64 = 1000;
/// Delay between "go" and the first count.
const START_DELAY_MS: u64 = 100;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    CountingDown,
    Active,
    RestingBetweenReps,
    RestingBetweenSets,
    Stopped,
}

/// Every pending deadline, in elapsed-domain milliseconds.
///
/// At most one of `countdown_ms`, `count_ms`, and `rest_end_ms` governs
/// cueing at any instant; transitions always clear the old deadline before
/// arming the next one.
#[derive(Debug, Clone, Copy, Default)]
struct Deadlines {
    /// Next pre-roll countdown tick.
    countdown_ms: Option<u64>,
    /// Next count tick in the 6-count cycle.
    count_ms: Option<u64>,
    /// End of the current rest.
    rest_end_ms: Option<u64>,
}

impl Deadlines {
    fn clear_all(&mut self) {
        *self = Self::default();
    }
}

/// The core workout session.
///
/// Owns all mutable session state exclusively; the host interacts only
/// through `start_workout` / `pause_workout` / `resume_workout` /
/// `stop_workout` / `tick`, all from a single control surface.
///
/// Each command has a `*_at(now_epoch_ms)` twin taking an explicit wall
/// clock, for hosts (and tests) that source time themselves; the plain
/// variants use [`now_ms`].
pub struct WorkoutSession {
    config: WorkoutConfig,
    plan: PacingPlan,
    dispatcher: CueDispatcher,
    session_id: Uuid,
    phase: Phase,
    /// Position within the current rep's count cycle, 0..=counts_per_rep.
    current_count: u32,
    /// Completed reps, 0..=target_reps.
    current_rep: u32,
    /// 1-based set number; only advances in Sets mode.
    current_set: u32,
    /// Pre-roll seconds remaining, COUNTDOWN_SECONDS..=0.
    countdown_remaining: u32,
    clock: Option<SessionClock>,
    duration_ms: u64,
    deadlines: Deadlines,
}

impl WorkoutSession {
    /// Build a session for a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails fast with a configuration error; an invalid config never
    /// reaches the timing math.
    pub fn new(config: WorkoutConfig, dispatcher: CueDispatcher) -> Result<Self, CoreError> {
        let voice = dispatcher.style() == crate::cue::CueStyle::Voice;
        let plan = compute_pacing(&config, voice)?;
        Ok(Self {
            duration_ms: config.duration_ms(),
            config,
            plan,
            dispatcher,
            session_id: Uuid::new_v4(),
            phase: Phase::Idle,
            current_count: 0,
            current_rep: 0,
            current_set: 1,
            countdown_remaining: 0,
            clock: None,
            deadlines: Deadlines::default(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn current_count(&self) -> u32 {
        self.current_count
    }

    pub fn current_rep(&self) -> u32 {
        self.current_rep
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn is_paused(&self) -> bool {
        self.clock.as_ref().is_some_and(SessionClock::is_paused)
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn plan(&self) -> &PacingPlan {
        &self.plan
    }

    /// Elapsed milliseconds, excluding paused intervals. Zero before start.
    /// Re-based at "go", so once counting is live this is active time only.
    pub fn elapsed_ms_at(&self, now_epoch_ms: u64) -> u64 {
        self.clock
            .as_ref()
            .map_or(0, |c| c.elapsed_ms(now_epoch_ms))
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms_at(now_ms())
    }

    /// Total milliseconds spent paused, including an open pause.
    pub fn paused_accumulated_ms_at(&self, now_epoch_ms: u64) -> u64 {
        self.clock
            .as_ref()
            .map_or(0, |c| c.paused_ms(now_epoch_ms))
    }

    /// Whole seconds of rest remaining, rounded up for display.
    pub fn rest_remaining_seconds_at(&self, now_epoch_ms: u64) -> u64 {
        match (self.deadlines.rest_end_ms, self.clock.as_ref()) {
            (Some(end), Some(clock)) => {
                let remaining = end.saturating_sub(clock.elapsed_ms(now_epoch_ms));
                remaining.div_ceil(1000)
            }
            _ => 0,
        }
    }

    pub fn rest_remaining_seconds(&self) -> u64 {
        self.rest_remaining_seconds_at(now_ms())
    }

    /// Full state snapshot at the given wall clock.
    pub fn snapshot_at(&self, now_epoch_ms: u64) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            current_count: self.current_count,
            current_rep: self.current_rep,
            current_set: self.current_set,
            elapsed_ms: self.elapsed_ms_at(now_epoch_ms),
            rest_remaining_seconds: self.rest_remaining_seconds_at(now_epoch_ms),
            countdown_remaining: self.countdown_remaining,
            paused: self.is_paused(),
            at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> Event {
        self.snapshot_at(now_ms())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or restart) the workout.
    ///
    /// Resets every counter, recomputes the pacing plan, emits the
    /// get-ready cue, and enters the pre-roll countdown. The "5" of the
    /// countdown rides on the get-ready announcement; ticks then call
    /// 4..1 at one-second intervals before "go". The duration budget only
    /// starts running at "go".
    ///
    /// # Errors
    ///
    /// Fails fast on an invalid configuration.
    pub fn start_workout_at(&mut self, now_epoch_ms: u64) -> Result<Event, CoreError> {
        let voice = self.dispatcher.style() == crate::cue::CueStyle::Voice;
        self.plan = compute_pacing(&self.config, voice)?;
        self.duration_ms = self.config.duration_ms();

        self.session_id = Uuid::new_v4();
        self.current_count = 0;
        self.current_rep = 0;
        self.current_set = 1;
        self.countdown_remaining = COUNTDOWN_SECONDS;
        self.clock = Some(SessionClock::start_at(now_epoch_ms));
        self.deadlines.clear_all();
        self.deadlines.countdown_ms = Some(COUNTDOWN_STEP_MS);
        self.phase = Phase::CountingDown;

        self.dispatcher.dispatch(Cue::GetReady);
        Ok(Event::WorkoutStarted {
            session_id: self.session_id,
            target_reps: self.config.target_reps,
            duration_ms: self.duration_ms,
            at: Utc::now(),
        })
    }

    /// # Errors
    ///
    /// Fails fast on an invalid configuration.
    pub fn start_workout(&mut self) -> Result<Event, CoreError> {
        self.start_workout_at(now_ms())
    }

    /// Pause the session. Deadlines are gated, not cancelled, so resume is
    /// cheap. No-op (returns `None`) when idle, stopped, or already paused.
    pub fn pause_workout_at(&mut self, now_epoch_ms: u64) -> Option<Event> {
        if matches!(self.phase, Phase::Idle | Phase::Stopped) || self.is_paused() {
            return None;
        }
        let clock = self.clock.as_mut()?;
        clock.pause_at(now_epoch_ms);
        Some(Event::WorkoutPaused {
            elapsed_ms: clock.elapsed_ms(now_epoch_ms),
            at: Utc::now(),
        })
    }

    pub fn pause_workout(&mut self) -> Option<Event> {
        self.pause_workout_at(now_ms())
    }

    /// Resume from pause. Missed cues are not replayed: the next cue fires
    /// at the next deadline on the pause-adjusted clock.
    pub fn resume_workout_at(&mut self, now_epoch_ms: u64) -> Option<Event> {
        if !self.is_paused() {
            return None;
        }
        let clock = self.clock.as_mut()?;
        clock.resume_at(now_epoch_ms);
        Some(Event::WorkoutResumed {
            elapsed_ms: clock.elapsed_ms(now_epoch_ms),
            at: Utc::now(),
        })
    }

    pub fn resume_workout(&mut self) -> Option<Event> {
        self.resume_workout_at(now_ms())
    }

    /// Stop the session. Idempotent: once stopped (or never started) this
    /// returns no events and fires no cue.
    pub fn stop_workout_at(&mut self, now_epoch_ms: u64) -> Vec<Event> {
        match self.phase {
            Phase::Idle | Phase::Stopped => Vec::new(),
            _ => {
                let elapsed = self.elapsed_ms_at(now_epoch_ms);
                vec![self.finish(StopReason::Manual, elapsed)]
            }
        }
    }

    pub fn stop_workout(&mut self) -> Vec<Event> {
        self.stop_workout_at(now_ms())
    }

    /// Advance the session against the wall clock. Call every ~100 ms.
    ///
    /// Returns the events produced by whatever transitions fired. While
    /// paused, idle, or stopped this is a no-op.
    pub fn tick_at(&mut self, now_epoch_ms: u64) -> Vec<Event> {
        if matches!(self.phase, Phase::Idle | Phase::Stopped) || self.is_paused() {
            return Vec::new();
        }
        let elapsed = self.elapsed_ms_at(now_epoch_ms);

        // Duration budget is checked on every tick, independent of the
        // count cycle. Whichever terminal condition a tick observes first
        // wins; `finish` runs at most once. The budget covers active time
        // only: the clock re-bases at "go", so the check never fires
        // during the pre-roll.
        if self.phase != Phase::CountingDown && elapsed >= self.duration_ms {
            return vec![self.finish(StopReason::TimeExpired, elapsed)];
        }

        match self.phase {
            Phase::CountingDown => self.tick_countdown(now_epoch_ms, elapsed),
            Phase::Active => self.tick_active(elapsed),
            Phase::RestingBetweenReps | Phase::RestingBetweenSets => self.tick_rest(elapsed),
            Phase::Idle | Phase::Stopped => Vec::new(),
        }
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(now_ms())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_countdown(&mut self, now_epoch_ms: u64, elapsed: u64) -> Vec<Event> {
        let Some(deadline) = self.deadlines.countdown_ms else {
            return Vec::new();
        };
        if elapsed < deadline {
            return Vec::new();
        }

        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining > 0 {
            self.dispatcher
                .dispatch(Cue::CountdownTick(self.countdown_remaining));
            self.deadlines.countdown_ms = Some(deadline + COUNTDOWN_STEP_MS);
            vec![Event::CountdownTick {
                remaining: self.countdown_remaining,
                at: Utc::now(),
            }]
        } else {
            self.deadlines.countdown_ms = None;
            // Active time starts at "go": the clock re-bases here, so the
            // pre-roll is never charged against the duration budget.
            self.clock = Some(SessionClock::start_at(now_epoch_ms));
            self.deadlines.count_ms = Some(START_DELAY_MS);
            self.phase = Phase::Active;
            self.dispatcher.dispatch(Cue::Go);
            vec![Event::WorkoutBegan { at: Utc::now() }]
        }
    }

    fn tick_active(&mut self, elapsed: u64) -> Vec<Event> {
        let Some(deadline) = self.deadlines.count_ms else {
            return Vec::new();
        };
        if elapsed < deadline {
            return Vec::new();
        }

        let at = Utc::now();
        let mut events = Vec::new();

        let next_count = (self.current_count % self.config.counts_per_rep) + 1;
        self.current_count = next_count;
        let last_count_of_rep = next_count == self.config.counts_per_rep;

        // The final count of a rep announces the rep number instead of the
        // count itself.
        if last_count_of_rep {
            self.dispatcher.dispatch(Cue::Rep(self.current_rep + 1));
        } else {
            self.dispatcher.dispatch(Cue::Count(next_count));
        }
        events.push(Event::CountAdvanced {
            count: next_count,
            rep: self.current_rep,
            at,
        });

        if last_count_of_rep {
            self.current_rep += 1;
            events.push(Event::RepCompleted {
                rep: self.current_rep,
                at,
            });

            if self.current_rep >= self.config.target_reps {
                events.push(self.finish(StopReason::TargetReached, elapsed));
                return events;
            }

            // Set boundaries take the longer set rest; otherwise any
            // positive between-rep rest applies.
            if let Mode::Sets(sets) = self.config.mode {
                if self.current_rep % sets.reps_per_set == 0 {
                    let rest_ms = (sets.rest_between_sets_seconds * 1000.0).round() as u64;
                    self.current_set += 1;
                    events.push(Event::SetStarted {
                        set: self.current_set,
                        at,
                    });
                    events.push(self.enter_rest(
                        Phase::RestingBetweenSets,
                        RestKind::BetweenSets,
                        sets.rest_between_sets_seconds,
                        rest_ms,
                        elapsed,
                        at,
                    ));
                    return events;
                }
            }
            let rest_ms = self.plan.rest_between_reps_ms();
            if rest_ms > 0 {
                events.push(self.enter_rest(
                    Phase::RestingBetweenReps,
                    RestKind::BetweenReps,
                    self.plan.rest_between_reps_seconds,
                    rest_ms,
                    elapsed,
                    at,
                ));
                return events;
            }
        }

        // Re-arm the count cycle. A deadline that slipped under load snaps
        // forward instead of rapid-firing the missed counts.
        let mut next_deadline = deadline + self.plan.ms_per_count;
        if next_deadline <= elapsed {
            next_deadline = elapsed + self.plan.ms_per_count;
        }
        self.deadlines.count_ms = Some(next_deadline);
        events
    }

    fn enter_rest(
        &mut self,
        phase: Phase,
        kind: RestKind,
        seconds: f64,
        rest_ms: u64,
        elapsed: u64,
        at: chrono::DateTime<Utc>,
    ) -> Event {
        // The resting deadline replaces the count-cycle deadline; the two
        // never run concurrently.
        self.phase = phase;
        self.deadlines.count_ms = None;
        self.deadlines.rest_end_ms = Some(elapsed + rest_ms);
        Event::RestStarted { kind, seconds, at }
    }

    fn tick_rest(&mut self, elapsed: u64) -> Vec<Event> {
        let Some(end) = self.deadlines.rest_end_ms else {
            return Vec::new();
        };
        if elapsed < end {
            return Vec::new();
        }
        // Back to counting without re-announcing "go".
        self.phase = Phase::Active;
        self.deadlines.rest_end_ms = None;
        self.deadlines.count_ms = Some(elapsed + self.plan.ms_per_count);
        vec![Event::RestEnded { at: Utc::now() }]
    }

    /// Single exit path to `Stopped`: clears every deadline in one pass,
    /// cancels pending speech, and fires the completion cue exactly once.
    fn finish(&mut self, reason: StopReason, elapsed: u64) -> Event {
        self.deadlines.clear_all();
        self.phase = Phase::Stopped;
        self.current_count = 0;
        self.dispatcher.cancel();
        self.dispatcher.dispatch(Cue::Complete);
        Event::WorkoutCompleted {
            reason,
            reps: self.current_rep,
            elapsed_ms: elapsed,
            at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for WorkoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutSession")
            .field("phase", &self.phase)
            .field("current_count", &self.current_count)
            .field("current_rep", &self.current_rep)
            .field("current_set", &self.current_set)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
