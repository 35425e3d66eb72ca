pub mod config;
pub mod manifest;
pub mod pace;
pub mod run;

use clap::Args;
use sixcount_core::{Mode, Pace, SetsConfig, WorkoutConfig};

/// Workout configuration flags shared by `pace` and `run`.
///
/// Flags override the persisted app config; anything left unset falls back
/// to `~/.config/sixcount/config.toml`.
#[derive(Args, Debug)]
pub struct WorkoutArgs {
    /// Session length in minutes
    #[arg(long)]
    pub duration: Option<f64>,
    /// Target rep count
    #[arg(long)]
    pub reps: Option<u32>,
    /// Split the workout into this many sets
    #[arg(long)]
    pub sets: Option<u32>,
    /// Reps per set (requires --sets)
    #[arg(long, requires = "sets")]
    pub reps_per_set: Option<u32>,
    /// Rest between sets in seconds (requires --sets)
    #[arg(long, requires = "sets")]
    pub set_rest: Option<f64>,
    /// Pace preset
    #[arg(long, value_enum)]
    pub pace: Option<PaceArg>,
    /// Explicit seconds per count, overrides --pace
    #[arg(long)]
    pub custom_pace: Option<f64>,
    /// Announce counts with voice callouts instead of tones
    #[arg(long)]
    pub voice: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum PaceArg {
    Faster,
    Default,
    Slower,
}

impl From<PaceArg> for Pace {
    fn from(value: PaceArg) -> Self {
        match value {
            PaceArg::Faster => Pace::Faster,
            PaceArg::Default => Pace::Default,
            PaceArg::Slower => Pace::Slower,
        }
    }
}

impl WorkoutArgs {
    /// Merge the flags over a base configuration.
    pub fn apply(&self, base: WorkoutConfig) -> WorkoutConfig {
        let mut config = base;
        if let Some(duration) = self.duration {
            config.duration_minutes = duration;
        }
        if let Some(reps) = self.reps {
            config.target_reps = reps;
        }
        if let Some(pace) = self.pace {
            config.pace = pace.into();
        }
        if let Some(custom) = self.custom_pace {
            config.custom_pace_seconds = Some(custom);
        }
        if let Some(sets) = self.sets {
            let reps_per_set = self
                .reps_per_set
                .unwrap_or_else(|| config.target_reps.div_ceil(sets.max(1)));
            config.mode = Mode::Sets(SetsConfig {
                sets,
                reps_per_set,
                rest_between_sets_seconds: self.set_rest.unwrap_or(30.0),
            });
        }
        config
    }
}
