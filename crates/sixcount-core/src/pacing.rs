//! Pacing calculator.
//!
//! Pure function from a workout configuration to the timing constants the
//! session state machine runs on. No state, no I/O. The plan is recomputed
//! whenever config or voice mode changes -- voice cadence may diverge from
//! tone cadence in a future extension, so callers must not cache it.

use serde::{Deserialize, Serialize};

use crate::config::{Mode, WorkoutConfig};
use crate::error::ConfigError;

/// Derived timing constants for one workout session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingPlan {
    /// Duration of a single count.
    pub seconds_per_count: f64,
    /// `seconds_per_count` in whole milliseconds, the count-cycle period.
    pub ms_per_count: u64,
    /// Target cadence: how much wall-clock each rep gets, rest included.
    pub seconds_per_rep: f64,
    /// Time to execute one full rep: `seconds_per_count * counts_per_rep`.
    pub seconds_per_burpee: f64,
    /// Rest inserted after each rep; zero when the pace already fills (or
    /// exceeds) the cadence.
    pub rest_between_reps_seconds: f64,
}

impl PacingPlan {
    /// Rest between reps in whole milliseconds.
    pub fn rest_between_reps_ms(&self) -> u64 {
        (self.rest_between_reps_seconds * 1000.0).round() as u64
    }
}

/// Compute the pacing plan for a validated configuration.
///
/// `voice_enabled` is accepted (and currently ignored) so that callers
/// already recompute when the cue strategy changes.
///
/// When the requested pace exceeds the per-rep time budget, rest collapses
/// to zero and reps run back-to-back; the session may then overrun or
/// underrun the target rep count. That is deliberate degraded-mode policy,
/// not an error. Likewise a Sets-mode configuration whose set rests consume
/// the whole budget yields a non-positive cadence and zero rest.
///
/// # Errors
///
/// Returns [`ConfigError`] if the configuration fails validation.
pub fn compute_pacing(
    config: &WorkoutConfig,
    _voice_enabled: bool,
) -> Result<PacingPlan, ConfigError> {
    config.validate()?;

    let total_seconds = config.duration_minutes * 60.0;
    let seconds_per_count = config.seconds_per_count();
    let seconds_per_burpee = seconds_per_count * config.counts_per_rep as f64;

    let seconds_per_rep = match config.mode {
        Mode::Continuous => total_seconds / config.target_reps as f64,
        Mode::Sets(sets) => {
            let total_rest = (sets.sets - 1) as f64 * sets.rest_between_sets_seconds;
            let active_time = total_seconds - total_rest;
            active_time / (sets.sets * sets.reps_per_set) as f64
        }
    };

    let rest_between_reps_seconds = (seconds_per_rep - seconds_per_burpee).max(0.0);

    Ok(PacingPlan {
        seconds_per_count,
        ms_per_count: (seconds_per_count * 1000.0).round() as u64,
        seconds_per_rep,
        seconds_per_burpee,
        rest_between_reps_seconds,
    })
}
