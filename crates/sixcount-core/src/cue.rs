//! Cue dispatch.
//!
//! The session state machine announces counts, rep numbers, the pre-roll
//! countdown, and completion through a [`CueDispatcher`]. The dispatcher is
//! polymorphic over two strategies -- short tones or voice callouts -- and
//! pushes all actual sound out through the [`AudioSink`] seam. Dispatch is
//! fire-and-forget: a slow or failed cue never delays the workout timeline,
//! and the dispatcher holds no session state of its own.

use serde::{Deserialize, Serialize};

use crate::manifest::{count_callout, CalloutManifest, ClipSegment};

/// Tone frequencies, one per cue meaning.
pub mod tones {
    /// Normal count tick.
    pub const COUNT_HZ: f32 = 440.0;
    /// New-rep tick and the get-ready cue.
    pub const REP_HZ: f32 = 880.0;
    /// Go and completion.
    pub const GO_HZ: f32 = 1320.0;
    /// Second note of the completion pair.
    pub const COMPLETE_HIGH_HZ: f32 = 1760.0;

    pub const COUNT_MS: u64 = 100;
    pub const REP_MS: u64 = 150;
    pub const GET_READY_MS: u64 = 200;
    pub const GO_MS: u64 = 300;
}

/// A single cueable moment in the workout timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    /// Fired once when the pre-roll countdown begins.
    GetReady,
    /// Pre-roll countdown tick, 5 down to 1.
    CountdownTick(u32),
    /// Countdown finished, the workout is live.
    Go,
    /// Count tick within a rep, 1..counts_per_rep.
    Count(u32),
    /// Final count of a rep: announces the rep the athlete is about to
    /// start, not the count itself.
    Rep(u32),
    /// Workout complete.
    Complete,
}

/// Speech parameters passed through to the synthesis collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeakOptions {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            rate: 1.2,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeakOptions {
    fn rate(rate: f32) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    fn rate_pitch(rate: f32, pitch: f32) -> Self {
        Self {
            rate,
            pitch,
            volume: 1.0,
        }
    }
}

/// Seam to the audio/speech collaborators.
///
/// Every method is best-effort and non-blocking; implementations must not
/// stall the tick loop. `play_clip` reports failure so the voice strategy
/// can fall back to synthesized speech.
pub trait AudioSink {
    fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64);
    fn speak(&mut self, text: &str, options: SpeakOptions);
    /// Whether the previous utterance is still playing. Used only for
    /// same-text de-duplication; a sink without visibility may return false.
    fn is_speaking(&self) -> bool {
        false
    }
    /// Play an extracted clip segment. Returns false when the clip could
    /// not be played (not loaded, no audio backend, ...).
    fn play_clip(&mut self, segment: &ClipSegment) -> bool;
    fn cancel_speech(&mut self) {}
}

/// Which cue strategy a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueStyle {
    /// Short beeps, one pitch/duration pair per cue type.
    Tone,
    /// Spoken callouts, preferring recorded clips from the manifest.
    Voice,
}

/// Routes cues to the audio sink according to the selected style.
pub struct CueDispatcher {
    style: CueStyle,
    sink: Box<dyn AudioSink + Send>,
    manifest: Option<CalloutManifest>,
    /// Text of the most recent utterance, for same-text de-duplication:
    /// at most one in-flight utterance per dispatcher, text-compared.
    last_spoken: Option<String>,
}

impl CueDispatcher {
    pub fn new(style: CueStyle, sink: Box<dyn AudioSink + Send>) -> Self {
        Self {
            style,
            sink,
            manifest: None,
            last_spoken: None,
        }
    }

    /// Attach a callout manifest for the voice strategy.
    pub fn with_manifest(mut self, manifest: CalloutManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn style(&self) -> CueStyle {
        self.style
    }

    /// Announce a cue. Never blocks, never fails the session.
    pub fn dispatch(&mut self, cue: Cue) {
        match self.style {
            CueStyle::Tone => self.dispatch_tone(cue),
            CueStyle::Voice => self.dispatch_voice(cue),
        }
    }

    /// Cancel any pending speech, e.g. when the session stops.
    pub fn cancel(&mut self) {
        self.sink.cancel_speech();
        self.last_spoken = None;
    }

    fn dispatch_tone(&mut self, cue: Cue) {
        match cue {
            Cue::GetReady => self.sink.play_tone(tones::REP_HZ, tones::GET_READY_MS),
            Cue::CountdownTick(_) => self.sink.play_tone(tones::COUNT_HZ, tones::COUNT_MS),
            Cue::Go => self.sink.play_tone(tones::GO_HZ, tones::GO_MS),
            Cue::Count(_) => self.sink.play_tone(tones::COUNT_HZ, tones::COUNT_MS),
            Cue::Rep(_) => self.sink.play_tone(tones::REP_HZ, tones::REP_MS),
            Cue::Complete => {
                self.sink.play_tone(tones::GO_HZ, tones::GO_MS);
                self.sink.play_tone(tones::COMPLETE_HIGH_HZ, tones::GO_MS);
            }
        }
    }

    fn dispatch_voice(&mut self, cue: Cue) {
        match cue {
            Cue::GetReady => self.speak("Get ready! Starting in 5", SpeakOptions::rate(1.2)),
            Cue::CountdownTick(n) => self.speak(&n.to_string(), SpeakOptions::rate(1.3)),
            Cue::Go => self.speak("Go!", SpeakOptions::rate_pitch(1.3, 1.2)),
            Cue::Count(n) => {
                if !self.play_count_clip(n) {
                    self.speak(&count_callout(n), SpeakOptions::rate(1.3));
                }
            }
            Cue::Rep(n) => {
                if !self.play_rep_clip(n) {
                    self.speak(&n.to_string(), SpeakOptions::rate_pitch(1.3, 1.2));
                }
            }
            Cue::Complete => self.speak("Workout complete!", SpeakOptions::rate_pitch(1.0, 1.1)),
        }
    }

    fn play_count_clip(&mut self, count: u32) -> bool {
        match self.manifest.as_ref().and_then(|m| m.count(count)) {
            Some(segment) => self.sink.play_clip(segment),
            None => false,
        }
    }

    fn play_rep_clip(&mut self, rep: u32) -> bool {
        match self.manifest.as_ref().and_then(|m| m.rep(rep)) {
            Some(segment) => self.sink.play_clip(segment),
            None => false,
        }
    }

    fn speak(&mut self, text: &str, options: SpeakOptions) {
        // Same utterance still in flight: skip instead of stacking.
        if self.sink.is_speaking() && self.last_spoken.as_deref() == Some(text) {
            return;
        }
        self.last_spoken = Some(text.to_string());
        self.sink.speak(text, options);
    }
}

impl std::fmt::Debug for CueDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueDispatcher")
            .field("style", &self.style)
            .field("has_manifest", &self.manifest.is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    use super::*;

    /// Records everything dispatched to it.
    #[derive(Default)]
    pub struct RecordingSink {
        pub tones: Vec<(f32, u64)>,
        pub spoken: Vec<String>,
        pub clips: Vec<String>,
        pub speaking: bool,
        pub clip_success: bool,
        pub cancelled: u32,
    }

    impl AudioSink for RecordingSink {
        fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64) {
            self.tones.push((frequency_hz, duration_ms));
        }

        fn speak(&mut self, text: &str, _options: SpeakOptions) {
            self.spoken.push(text.to_string());
        }

        fn is_speaking(&self) -> bool {
            self.speaking
        }

        fn play_clip(&mut self, segment: &ClipSegment) -> bool {
            self.clips.push(segment.text.clone());
            self.clip_success
        }

        fn cancel_speech(&mut self) {
            self.cancelled += 1;
        }
    }
}
