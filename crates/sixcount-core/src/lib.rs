//! # Sixcount Core Library
//!
//! Core business logic for the sixcount 6-count burpee trainer. It follows
//! a CLI-first philosophy: everything the timer does is available through a
//! standalone CLI binary, with any GUI being a thin layer over this same
//! library.
//!
//! ## Architecture
//!
//! - **Pacing Calculator**: pure function from a workout configuration to
//!   the timing constants a session runs on
//! - **Workout Session**: a wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick()` for progress
//! - **Cue Dispatcher**: tone-beep or voice-callout announcements, pushed
//!   through the [`AudioSink`] seam to external audio/speech collaborators
//! - **Callout Manifest**: mapping from count/rep numbers to pre-recorded
//!   audio clips extracted offline from a workout video
//! - **Storage**: TOML-based application configuration
//!
//! ## Key Components
//!
//! - [`WorkoutSession`]: core session state machine
//! - [`compute_pacing`]: pacing calculator
//! - [`CueDispatcher`]: cue strategy selection and dispatch
//! - [`AppConfig`]: persisted application configuration

pub mod clock;
pub mod config;
pub mod cue;
pub mod error;
pub mod events;
pub mod manifest;
pub mod pacing;
pub mod session;
pub mod storage;

pub use clock::SessionClock;
pub use config::{Mode, Pace, SetsConfig, WorkoutConfig};
pub use cue::{AudioSink, Cue, CueDispatcher, CueStyle, SpeakOptions};
pub use error::{ConfigError, CoreError, ManifestError};
pub use events::{Event, RestKind, StopReason};
pub use manifest::{CalloutManifest, ClipSegment};
pub use pacing::{compute_pacing, PacingPlan};
pub use session::{Phase, WorkoutSession};
pub use storage::AppConfig;
