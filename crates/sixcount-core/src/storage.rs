//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default workout configuration (duration, reps, mode, pace)
//! - Cue style (tone beeps vs. voice callouts)
//! - Path to the audio-callout manifest, when one has been extracted
//!
//! Configuration is stored at `~/.config/sixcount/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::WorkoutConfig;
use crate::cue::CueStyle;

/// Returns `~/.config/sixcount[-dev]/` based on SIXCOUNT_ENV.
///
/// Set SIXCOUNT_ENV=dev to use the development data directory.
///
/// # Errors
///
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SIXCOUNT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sixcount-dev")
    } else {
        base_dir.join("sixcount")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn default_cue_style() -> CueStyle {
    CueStyle::Tone
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/sixcount/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default workout used when the CLI is run without overrides.
    #[serde(default)]
    pub workout: WorkoutConfig,
    /// Which cue strategy sessions use.
    #[serde(default = "default_cue_style")]
    pub cue_style: CueStyle,
    /// Callout manifest to load for the voice strategy (optional).
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workout: WorkoutConfig::default(),
            cue_style: CueStyle::Tone,
            manifest_path: None,
        }
    }
}

impl AppConfig {
    /// Path of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed, or the
    /// default config cannot be written.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: AppConfig = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed back into the config shape.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err("config key is empty".into());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            let object = current
                .as_object_mut()
                .ok_or_else(|| format!("'{part}' is not a settable key"))?;
            if !object.contains_key(part) {
                return Err(format!("unknown config key: {part}").into());
            }
            // Accept raw JSON (numbers, booleans) and fall back to a
            // plain string.
            let parsed = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
            object.insert(part.to_string(), parsed);
            return Ok(());
        }
        current = current
            .get_mut(part)
            .ok_or_else(|| format!("unknown config key: {part}"))?;
    }
    Ok(())
}
