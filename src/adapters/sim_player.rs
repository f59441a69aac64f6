//! Simulated playback engine.
//!
//! Implements [`PlaybackPort`] without producing audio.  Time only moves
//! when the host calls [`SimulatedPlayer::advance`], so tests stay
//! deterministic.  Locators listed with [`SimulatedPlayer::mark_unplayable`]
//! fail to start, standing in for missing or corrupt files.

use log::debug;

use crate::app::ports::{PlaybackError, PlaybackPort};

/// Track length reported for every locator unless overridden.
pub const DEFAULT_DURATION_MS: u64 = 180_000;

#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    loaded: Option<String>,
    playing: bool,
    position_ms: u64,
    duration_ms: u64,
    volume: u8,
    unplayable: Vec<String>,
    starts: Vec<String>,
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlayer {
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION_MS)
    }

    pub fn with_duration(duration_ms: u64) -> Self {
        Self {
            loaded: None,
            playing: false,
            position_ms: 0,
            duration_ms,
            volume: 100,
            unplayable: Vec::new(),
            starts: Vec::new(),
        }
    }

    /// Make `start(locator)` fail from now on.
    pub fn mark_unplayable(&mut self, locator: impl Into<String>) {
        self.unplayable.push(locator.into());
    }

    /// Move the playhead forward while playing.  Returns `true` when the
    /// track reached its end (the engine then stops by itself).
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        if !self.playing {
            return false;
        }
        self.position_ms = self.position_ms.saturating_add(elapsed_ms);
        if self.position_ms >= self.duration_ms {
            self.position_ms = self.duration_ms;
            self.playing = false;
            debug!("SimulatedPlayer: completed {:?}", self.loaded);
            return true;
        }
        false
    }

    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Every locator passed to a successful `start`, in order.
    pub fn starts(&self) -> &[String] {
        &self.starts
    }
}

impl PlaybackPort for SimulatedPlayer {
    fn start(&mut self, locator: &str) -> Result<(), PlaybackError> {
        if self.unplayable.iter().any(|l| l == locator) {
            self.loaded = None;
            self.playing = false;
            self.position_ms = 0;
            return Err(PlaybackError::Unplayable {
                locator: locator.to_owned(),
                reason: "unsupported source".into(),
            });
        }
        self.loaded = Some(locator.to_owned());
        self.playing = true;
        self.position_ms = 0;
        self.starts.push(locator.to_owned());
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        if self.position_ms >= self.duration_ms {
            self.position_ms = 0;
        }
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.loaded = None;
        self.playing = false;
        self.position_ms = 0;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> u64 {
        if self.loaded.is_some() {
            self.duration_ms
        } else {
            0
        }
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<(), PlaybackError> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        self.position_ms = position_ms.min(self.duration_ms);
        Ok(())
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level;
    }
}
