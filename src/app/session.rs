//! Session state owned by the controller.
//!
//! `SessionState` is the only mutable view of "what is loaded and is it
//! playing".  Handlers in [`Controller`](super::controller::Controller)
//! read and write it; nothing else does.  The transport label
//! ([`PlayerState`]) is derived, never stored.

use crate::protocol::PlayerState;

use super::ports::Track;

/// Current genre, loaded track list, cursor, and playback flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Loaded genre; empty when nothing is loaded.
    pub genre: String,
    /// Loaded track list, in play order.
    pub songs: Vec<Track>,
    /// Cursor into `songs`.  Always `< songs.len()` when `songs` is
    /// non-empty; meaningless otherwise.
    pub index: usize,
    /// Whether the engine was last told to play.
    pub playing: bool,
    /// Title of the last track that started successfully.
    pub current_title: Option<String>,
    /// Output level, 0–100.
    pub volume: u8,
}

impl SessionState {
    pub fn new(volume: u8) -> Self {
        Self {
            genre: String::new(),
            songs: Vec::new(),
            index: 0,
            playing: false,
            current_title: None,
            volume: volume.min(100),
        }
    }

    pub fn has_songs(&self) -> bool {
        !self.songs.is_empty()
    }

    /// Whether `genre`'s track list is already loaded.
    pub fn is_loaded(&self, genre: &str) -> bool {
        self.has_songs() && self.genre == genre
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.songs.get(self.index)
    }

    pub fn total(&self) -> usize {
        self.songs.len()
    }

    /// Index after the cursor, wrapping at the end.
    pub fn next_index(&self) -> usize {
        match self.songs.len() {
            0 => 0,
            n => (self.index + 1) % n,
        }
    }

    /// Index before the cursor, wrapping at the start.
    pub fn previous_index(&self) -> usize {
        match self.songs.len() {
            0 => 0,
            n => (self.index + n - 1) % n,
        }
    }

    /// Commit a selection: genre, list and cursor change together.
    pub fn select(&mut self, genre: &str, songs: Vec<Track>, index: usize) {
        debug_assert!(index < songs.len());
        if self.genre != genre {
            self.genre = genre.to_owned();
        }
        self.songs = songs;
        self.index = index;
    }

    /// Forget everything loaded.  Volume survives.
    pub fn clear(&mut self) {
        self.genre.clear();
        self.songs.clear();
        self.index = 0;
        self.playing = false;
        self.current_title = None;
    }

    /// `PLAYING` while playing, `PAUSED` while a started track is held,
    /// `STOPPED` otherwise.
    pub fn player_state(&self) -> PlayerState {
        if self.playing {
            PlayerState::Playing
        } else if self.current_title.is_some() {
            PlayerState::Paused
        } else {
            PlayerState::Stopped
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(100)
    }
}
