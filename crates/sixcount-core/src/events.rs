use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Phase;

/// Why a session reached `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The target rep count was completed.
    TargetReached,
    /// The wall-clock budget ran out.
    TimeExpired,
    /// `stop_workout()` was called.
    Manual,
}

/// Which kind of rest a resting phase is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestKind {
    BetweenReps,
    BetweenSets,
}

/// Every state change in the session produces an Event.
/// The host UI polls `tick()` for them; cues are dispatched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    WorkoutStarted {
        session_id: Uuid,
        target_reps: u32,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining: u32,
        at: DateTime<Utc>,
    },
    /// The pre-roll countdown finished; counting is live.
    WorkoutBegan {
        at: DateTime<Utc>,
    },
    CountAdvanced {
        count: u32,
        rep: u32,
        at: DateTime<Utc>,
    },
    RepCompleted {
        rep: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        kind: RestKind,
        seconds: f64,
        at: DateTime<Utc>,
    },
    RestEnded {
        at: DateTime<Utc>,
    },
    SetStarted {
        set: u32,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        reason: StopReason,
        reps: u32,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        current_count: u32,
        current_rep: u32,
        current_set: u32,
        elapsed_ms: u64,
        rest_remaining_seconds: u64,
        countdown_remaining: u32,
        paused: bool,
        at: DateTime<Utc>,
    },
}
