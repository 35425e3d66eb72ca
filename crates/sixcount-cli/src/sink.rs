//! Terminal audio sink.
//!
//! The core treats audio and speech as external collaborators behind the
//! `AudioSink` seam. In the terminal, tones become the bell character plus
//! a pitch annotation, speech becomes printed callout lines, and manifest
//! clips are simulated (the real clips live next to the web UI's assets).

use std::io::Write;

use sixcount_core::{AudioSink, ClipSegment, SpeakOptions};

/// Prints cues instead of playing them. Best-effort and non-blocking,
/// matching the dispatch contract.
pub struct TerminalSink {
    /// Ring the terminal bell on tones.
    bell: bool,
}

impl TerminalSink {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl AudioSink for TerminalSink {
    fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64) {
        if self.bell {
            print!("\x07");
        }
        println!("[tone {frequency_hz:.0} Hz, {duration_ms} ms]");
        let _ = std::io::stdout().flush();
    }

    fn speak(&mut self, text: &str, _options: SpeakOptions) {
        println!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn play_clip(&mut self, segment: &ClipSegment) -> bool {
        // No audio backend here; report the clip and claim success so the
        // voice strategy does not double-announce through speech.
        println!("[clip \"{}\" {:.2}s-{:.2}s]", segment.text, segment.start, segment.end);
        let _ = std::io::stdout().flush();
        true
    }
}
