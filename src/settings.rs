//! Settings loaded from TOML
//!
//! Read from ~/.config/blockfall/settings.toml (or platform equivalent),
//! or from an explicit path. Missing fields fall back to defaults.

use crate::game::Timing;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Timing settings
    pub timing: TimingSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    })
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys {
        [key] => serializer.serialize_str(key),
        keys => keys.serialize(serializer),
    }
}

/// Timing settings, all durations in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Fall interval at the start of a game
    pub initial_fall_ms: f64,
    /// Play time between speed-ups
    pub speed_increase_interval_ms: u64,
    /// Fall interval multiplier applied at each speed-up
    pub speed_increase_factor: f64,
    /// Hold time before a held button first repeats
    pub initial_move_delay_ms: u64,
    /// Repeat period for held buttons
    pub move_repeat_delay_ms: u64,
    /// How long completed rows stay visible before removal
    pub line_clear_delay_ms: u64,
    /// Upper bound on a single tick's elapsed time
    pub max_frame_delta_ms: u64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            rotate: vec!["Up".to_string()],
            hard_drop: vec!["Space".to_string()],
            pause: vec!["p".to_string()],
            restart: vec!["Enter".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self::from(&Timing::default())
    }
}

impl From<&Timing> for TimingSettings {
    fn from(timing: &Timing) -> Self {
        Self {
            initial_fall_ms: timing.initial_fall_ms,
            speed_increase_interval_ms: timing.speed_increase_interval.as_millis() as u64,
            speed_increase_factor: timing.speed_increase_factor,
            initial_move_delay_ms: timing.initial_move_delay.as_millis() as u64,
            move_repeat_delay_ms: timing.move_repeat_delay.as_millis() as u64,
            line_clear_delay_ms: timing.line_clear_delay.as_millis() as u64,
            max_frame_delta_ms: timing.max_frame_delta.as_millis() as u64,
        }
    }
}

impl TimingSettings {
    /// Convert into engine timing, replacing nonsensical values with defaults
    pub fn to_timing(&self) -> Timing {
        let defaults = Timing::default();
        let initial_fall_ms = if self.initial_fall_ms.is_finite() && self.initial_fall_ms > 0.0 {
            self.initial_fall_ms
        } else {
            tracing::warn!(value = self.initial_fall_ms, "invalid initial_fall_ms, using default");
            defaults.initial_fall_ms
        };
        let speed_increase_factor =
            if self.speed_increase_factor > 0.0 && self.speed_increase_factor <= 1.0 {
                self.speed_increase_factor
            } else {
                tracing::warn!(
                    value = self.speed_increase_factor,
                    "speed_increase_factor must be in (0, 1], using default"
                );
                defaults.speed_increase_factor
            };
        let max_frame_delta = if self.max_frame_delta_ms > 0 {
            Duration::from_millis(self.max_frame_delta_ms)
        } else {
            defaults.max_frame_delta
        };
        let speed_increase_interval = if self.speed_increase_interval_ms > 0 {
            Duration::from_millis(self.speed_increase_interval_ms)
        } else {
            defaults.speed_increase_interval
        };

        Timing {
            initial_fall_ms,
            speed_increase_interval,
            speed_increase_factor,
            initial_move_delay: Duration::from_millis(self.initial_move_delay_ms),
            move_repeat_delay: Duration::from_millis(self.move_repeat_delay_ms),
            line_clear_delay: Duration::from_millis(self.line_clear_delay_ms),
            max_frame_delta,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("failed to parse settings")
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Load settings from the default location. A missing file yields the
    /// defaults; an unreadable or malformed one is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Render settings back to TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_timing() {
        let timing = Settings::default().timing.to_timing();
        assert_eq!(timing, Timing::default());
        assert_eq!(timing.initial_fall_ms, 800.0);
        assert_eq!(timing.speed_increase_interval, Duration::from_secs(30));
        assert_eq!(timing.line_clear_delay, Duration::from_millis(600));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            rotate = ["Up", "x"]
            hard_drop = "Enter"

            [timing]
            initial_fall_ms = 500.0
            "#,
        )
        .expect("valid settings");

        assert_eq!(settings.keys.rotate, vec!["Up", "x"]);
        assert_eq!(settings.keys.hard_drop, vec!["Enter"]);
        assert_eq!(settings.keys.move_left, vec!["Left"]);
        assert_eq!(settings.timing.initial_fall_ms, 500.0);
        assert_eq!(settings.timing.move_repeat_delay_ms, 100);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Settings::from_toml("[timing]\ninitial_fall_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = TimingSettings {
            initial_fall_ms: -1.0,
            speed_increase_factor: 2.0,
            max_frame_delta_ms: 0,
            ..TimingSettings::default()
        };
        assert_eq!(settings.to_timing(), Timing::default());
    }

    #[test]
    fn test_serialize_single_key_as_string() {
        let text = Settings::default().to_toml().expect("serializable");
        assert!(text.contains("move_left = \"Left\""));
        assert!(text.contains("quit = [\"q\", \"Esc\"]") || text.contains("quit = [\n"));
        let back = Settings::from_toml(&text).expect("round trip");
        assert_eq!(back.keys.quit, vec!["q", "Esc"]);
    }
}
