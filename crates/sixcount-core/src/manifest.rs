//! Audio-callout manifest.
//!
//! The offline extraction pipeline slices spoken number callouts out of a
//! workout video's audio track and emits a JSON manifest mapping each count
//! (1-5) and rep number to a segment of the source audio. The voice cue
//! strategy consults this to decide whether a number has a real recorded
//! clip or must fall back to synthesized speech.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ManifestError;

/// Spoken words for each count of a 6-count burpee. The sixth slot exists
/// for completeness; the session announces the upcoming rep number there
/// instead of the word.
pub const COUNT_WORDS: [&str; 6] = ["One", "Two", "Three", "Four", "Five", "Six"];

/// Spoken form of a count, with a numeric fallback outside 1..=6.
pub fn count_callout(count: u32) -> String {
    match count {
        1..=6 => COUNT_WORDS[(count - 1) as usize].to_string(),
        other => other.to_string(),
    }
}

/// One extracted clip: offsets into the manifest's source audio file,
/// in seconds, plus the transcribed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSegment {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub text: String,
}

/// Mapping from count and rep numbers to extracted audio clips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalloutManifest {
    /// Source audio file the segment offsets index into.
    #[serde(rename = "audioFile")]
    pub audio_file: String,
    #[serde(default)]
    pub counts: HashMap<u32, ClipSegment>,
    #[serde(default)]
    pub reps: HashMap<u32, ClipSegment>,
}

impl CalloutManifest {
    /// Parse a manifest from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::ParseFailed`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a manifest from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ManifestError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&content)
    }

    pub fn has_count(&self, count: u32) -> bool {
        self.counts.contains_key(&count)
    }

    pub fn has_rep(&self, rep: u32) -> bool {
        self.reps.contains_key(&rep)
    }

    pub fn count(&self, count: u32) -> Option<&ClipSegment> {
        self.counts.get(&count)
    }

    pub fn rep(&self, rep: u32) -> Option<&ClipSegment> {
        self.reps.get(&rep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "audioFile": "/audio/workout-callouts.mp3",
        "counts": {
            "1": { "start": 2.4, "end": 2.9, "duration": 0.5, "text": "one" },
            "2": { "start": 3.1, "end": 3.6, "duration": 0.5, "text": "two" }
        },
        "reps": {
            "7": { "start": 41.0, "end": 41.6, "duration": 0.6, "text": "seven" }
        }
    }"#;

    #[test]
    fn parses_detailed_manifest() {
        let manifest = CalloutManifest::from_json(SAMPLE).unwrap();
        assert_eq!(manifest.audio_file, "/audio/workout-callouts.mp3");
        assert!(manifest.has_count(1));
        assert!(manifest.has_count(2));
        assert!(!manifest.has_count(3));
        assert!(manifest.has_rep(7));
        assert_eq!(manifest.count(1).unwrap().start, 2.4);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let manifest = CalloutManifest::from_json(r#"{"audioFile": "a.mp3"}"#).unwrap();
        assert!(!manifest.has_count(1));
        assert!(!manifest.has_rep(1));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CalloutManifest::from_json("not json").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let manifest = CalloutManifest::load(&path).unwrap();
        assert!(manifest.has_count(2));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CalloutManifest::load("/no/such/manifest.json").unwrap_err();
        assert!(err.to_string().contains("/no/such/manifest.json"));
    }

    #[test]
    fn count_words() {
        assert_eq!(count_callout(1), "One");
        assert_eq!(count_callout(5), "Five");
        assert_eq!(count_callout(11), "11");
    }
}
