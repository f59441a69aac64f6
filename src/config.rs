//! Controller configuration parameters
//!
//! Policy knobs for the controller.  Values can be overridden through a
//! [`ConfigPort`](crate::app::ports::ConfigPort) adapter such as
//! [`JsonConfigFile`](crate::adapters::json_config::JsonConfigFile).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// What `PAUSE` does when nothing is playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseWhenIdle {
    /// Silently ignore it: no response, no state change.
    #[default]
    Ignore,
    /// Answer with an `ERROR` response.
    Reject,
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Policy ---
    /// Behaviour of `PAUSE` while not playing
    pub pause_when_idle: PauseWhenIdle,
    /// Genres reported when discovery finds none (empty disables fallback)
    pub fallback_genres: Vec<String>,

    // --- Volume ---
    /// Volume at startup (0-100)
    pub default_volume: u8,
    /// Step applied by `VOLUME|UP` / `VOLUME|DOWN`
    pub volume_step: u8,

    // --- Playback ---
    /// Start the next track when the current one completes
    pub auto_advance: bool,

    // --- Discovery ---
    /// File extensions treated as tracks (case-insensitive, no dot)
    pub audio_extensions: Vec<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pause_when_idle: PauseWhenIdle::Ignore,
            fallback_genres: ["Rock", "Jazz", "Relax", "Salsa", "Cumbia", "Reggaeton"]
                .into_iter()
                .map(String::from)
                .collect(),

            default_volume: 100,
            volume_step: 10,

            auto_advance: true,

            audio_extensions: vec!["mp3".into()],
        }
    }
}

impl ControllerConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_volume > 100 {
            return Err(ConfigError::ValidationFailed(
                "default_volume must be 0–100",
            ));
        }
        if !(1..=100).contains(&self.volume_step) {
            return Err(ConfigError::ValidationFailed(
                "volume_step must be 1–100",
            ));
        }
        if self.audio_extensions.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "audio_extensions must not be empty",
            ));
        }
        if self
            .audio_extensions
            .iter()
            .any(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(ConfigError::ValidationFailed(
                "audio_extensions entries must be non-empty and dot-less",
            ));
        }
        if self.fallback_genres.iter().any(|g| g.contains('|')) {
            return Err(ConfigError::ValidationFailed(
                "fallback_genres must not contain '|'",
            ));
        }
        Ok(())
    }
}
