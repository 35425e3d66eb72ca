//! Workout configuration.
//!
//! A `WorkoutConfig` is immutable input, fixed before a session starts.
//! Validation happens up front: the pacing calculator and the session state
//! machine both assume a validated config and never divide by zero.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed number of counts in a 6-count burpee.
pub const DEFAULT_COUNTS_PER_REP: u32 = 6;

/// Per-count seconds for each pace preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Faster,
    #[default]
    Default,
    Slower,
}

impl Pace {
    /// Seconds per count for this preset.
    pub fn seconds_per_count(self) -> f64 {
        match self {
            Pace::Faster => 0.55,
            Pace::Default => 0.65,
            Pace::Slower => 0.75,
        }
    }
}

/// Sets-mode parameters: how the target reps break into sets, and the
/// longer rest inserted between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetsConfig {
    pub sets: u32,
    pub reps_per_set: u32,
    /// Rest between sets, in seconds.
    pub rest_between_sets_seconds: f64,
}

/// Workout structure: one continuous run, or sets with set-rest in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Mode {
    Continuous,
    Sets(SetsConfig),
}

/// Immutable workout configuration, set before a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Total session wall-clock budget, in minutes.
    pub duration_minutes: f64,
    /// Total reps to complete.
    pub target_reps: u32,
    #[serde(flatten)]
    pub mode: Mode,
    /// Counts per rep; 6 for 6-count burpees.
    pub counts_per_rep: u32,
    #[serde(default)]
    pub pace: Pace,
    /// Explicit seconds-per-count override; takes precedence over `pace`.
    #[serde(default)]
    pub custom_pace_seconds: Option<f64>,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 1.0,
            target_reps: 10,
            mode: Mode::Continuous,
            counts_per_rep: DEFAULT_COUNTS_PER_REP,
            pace: Pace::Default,
            custom_pace_seconds: None,
        }
    }
}

impl WorkoutConfig {
    /// Effective seconds per count: the custom override when set, else the
    /// pace preset.
    pub fn seconds_per_count(&self) -> f64 {
        self.custom_pace_seconds
            .unwrap_or_else(|| self.pace.seconds_per_count())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a descriptive [`ConfigError`] for any zero, negative, or
    /// non-finite field that would poison the timing math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_minutes.is_finite() || self.duration_minutes <= 0.0 {
            return Err(ConfigError::invalid(
                "duration_minutes",
                format!("must be a positive number, got {}", self.duration_minutes),
            ));
        }
        if self.target_reps == 0 {
            return Err(ConfigError::invalid("target_reps", "must be at least 1"));
        }
        if self.counts_per_rep == 0 {
            return Err(ConfigError::invalid("counts_per_rep", "must be at least 1"));
        }
        if let Some(pace) = self.custom_pace_seconds {
            if !pace.is_finite() || pace <= 0.0 {
                return Err(ConfigError::invalid(
                    "custom_pace_seconds",
                    format!("must be a positive number, got {pace}"),
                ));
            }
        }
        if let Mode::Sets(sets) = self.mode {
            if sets.sets == 0 {
                return Err(ConfigError::invalid("sets", "must be at least 1"));
            }
            if sets.reps_per_set == 0 {
                return Err(ConfigError::invalid("reps_per_set", "must be at least 1"));
            }
            if !sets.rest_between_sets_seconds.is_finite()
                || sets.rest_between_sets_seconds < 0.0
            {
                return Err(ConfigError::invalid(
                    "rest_between_sets_seconds",
                    format!(
                        "must be non-negative, got {}",
                        sets.rest_between_sets_seconds
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Total session budget in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.duration_minutes * 60_000.0) as u64
    }
}

/// Format milliseconds as `mm:ss` for display.
pub fn format_time(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}
