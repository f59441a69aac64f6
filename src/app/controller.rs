//! Controller: the hexagonal core.
//!
//! [`Controller`] owns the [`SessionState`] and the policy
//! [`ControllerConfig`].  It interprets one decoded [`Command`] at a time
//! and emits the resulting [`Response`]s through a [`ResponseSink`].  All
//! I/O flows through port traits injected at call sites, so the whole
//! state machine is testable with mock adapters.
//!
//! ```text
//!  CatalogPort  ──▶ ┌────────────────────────┐ ──▶ ResponseSink
//!                   │       Controller        │
//!  PlaybackPort ◀──│  SessionState · Config  │
//!                   └────────────────────────┘
//! ```
//!
//! Derived transport states (never stored, see
//! [`SessionState::player_state`]):
//!
//! ```text
//!            PLAY / NEXT / PREV
//!  STOPPED ─────────────────────▶ PLAYING
//!     ▲                            │   ▲
//!     │                      PAUSE │   │ RESUME
//!     │          STOP              ▼   │
//!     └─────────────────────────── PAUSED
//! ```
//!
//! `STOP` returns to `STOPPED` from any state; a failed start leaves the
//! selection loaded but not playing.

use log::{debug, info, warn};

use crate::config::{ControllerConfig, PauseWhenIdle};
use crate::error::{DomainError, Error};
use crate::protocol::{Command, Response};

use super::ports::{CatalogPort, PlaybackPort, ResponseSink, Track};
use super::session::SessionState;

type Outcome = Result<Option<Response>, Error>;

/// Where `NEXT` / `PREV` land on a list that was just loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// Single logical owner of the session.  Commands are serialized by
/// `&mut self`.
pub struct Controller {
    session: SessionState,
    config: ControllerConfig,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        let session = SessionState::new(config.default_volume);
        Self { session, config }
    }

    // ── Command handling ──────────────────────────────────────

    /// Execute `cmd` and emit its response (if any) through `sink`.
    ///
    /// Every failure is surfaced as an `ERROR` response; nothing here is
    /// fatal to the controller.
    pub fn handle_command(
        &mut self,
        cmd: &Command,
        catalog: &impl CatalogPort,
        player: &mut impl PlaybackPort,
        sink: &mut impl ResponseSink,
    ) {
        debug!("Controller: {}", cmd.name());
        match self.dispatch(cmd, catalog, player) {
            Ok(Some(response)) => sink.emit(&response),
            Ok(None) => {}
            Err(e) => {
                warn!("Controller: {} failed: {}", cmd.name(), e);
                sink.emit(&Response::error(e));
            }
        }
    }

    fn dispatch(
        &mut self,
        cmd: &Command,
        catalog: &impl CatalogPort,
        player: &mut impl PlaybackPort,
    ) -> Outcome {
        match cmd {
            Command::Ping => Ok(Some(Response::Pong)),

            // ── Selection ─────────────────────────────────────
            Command::PlayGenre { genre } => {
                let songs = self.tracks_for(genre, catalog)?;
                self.play_at(genre, songs, 0, player).map(Some)
            }
            Command::PlayIndex { genre, index } => {
                let songs = self.tracks_for(genre, catalog)?;
                let i = *index as usize;
                if i >= songs.len() {
                    return Err(DomainError::IndexOutOfRange {
                        index: *index,
                        total: songs.len(),
                    }
                    .into());
                }
                self.play_at(genre, songs, i, player).map(Some)
            }
            Command::PlaySong { genre, title } => {
                let songs = self.tracks_for(genre, catalog)?;
                let needle = title.to_lowercase();
                let Some(i) = songs
                    .iter()
                    .position(|t| t.title.to_lowercase().contains(&needle))
                else {
                    return Err(DomainError::TrackNotFound {
                        genre: genre.clone(),
                        title: title.clone(),
                    }
                    .into());
                };
                self.play_at(genre, songs, i, player).map(Some)
            }
            Command::Next { genre } => self.step(genre, Step::Forward, catalog, player),
            Command::Previous { genre } => self.step(genre, Step::Backward, catalog, player),

            // ── Transport ─────────────────────────────────────
            Command::Pause => self.pause(player),
            Command::Resume => self.resume(player).map(Some),
            Command::Stop => {
                player.stop();
                self.session.clear();
                info!("Controller: stopped");
                Ok(Some(Response::Stopped))
            }

            // ── Volume ────────────────────────────────────────
            Command::SetVolume { level } => Ok(Some(self.apply_volume(*level, player))),
            Command::VolumeUp => {
                let level = i32::from(self.session.volume) + i32::from(self.config.volume_step);
                Ok(Some(self.apply_volume(level, player)))
            }
            Command::VolumeDown => {
                let level = i32::from(self.session.volume) - i32::from(self.config.volume_step);
                Ok(Some(self.apply_volume(level, player)))
            }

            // ── Seek / progress ───────────────────────────────
            Command::SeekTo { position_ms } => {
                if self.session.current_track().is_none() {
                    return Err(DomainError::NothingLoaded.into());
                }
                player.seek_to(*position_ms)?;
                Ok(Some(progress(player)))
            }
            Command::GetProgress => Ok(Some(progress(player))),

            // ── Queries ───────────────────────────────────────
            Command::GetPlaylist { genre } => {
                let songs = catalog
                    .list_tracks(genre)
                    .into_iter()
                    .map(|t| t.title)
                    .collect();
                Ok(Some(Response::Playlist {
                    genre: genre.clone(),
                    songs,
                }))
            }
            Command::GetGenres => Ok(Some(self.genres(catalog))),
            Command::GetCurrentSong => {
                let track = self
                    .session
                    .current_track()
                    .ok_or(DomainError::NothingLoaded)?;
                Ok(Some(self.playing_response(&track.title, player)))
            }
            Command::GetStatus => Ok(Some(self.status(player))),
        }
    }

    // ── Lifecycle callbacks ───────────────────────────────────

    /// Push-on-join: a new subscriber gets `GENRES` then `STATUS`.
    pub fn on_subscriber_connected(
        &mut self,
        count: usize,
        catalog: &impl CatalogPort,
        player: &impl PlaybackPort,
        sink: &mut impl ResponseSink,
    ) {
        info!("Controller: subscriber joined ({} connected)", count);
        sink.emit(&self.genres(catalog));
        sink.emit(&self.status(player));
    }

    pub fn on_subscriber_disconnected(&mut self, remaining: usize) {
        info!("Controller: subscriber left ({} connected)", remaining);
    }

    /// The engine finished the current track.
    pub fn on_track_completed(
        &mut self,
        player: &mut impl PlaybackPort,
        sink: &mut impl ResponseSink,
    ) {
        if !self.session.has_songs() {
            debug!("Controller: completion with nothing loaded");
            return;
        }
        if !self.config.auto_advance {
            self.session.playing = false;
            sink.emit(&self.status(player));
            return;
        }

        let next = self.session.next_index();
        let genre = self.session.genre.clone();
        let songs = self.session.songs.clone();
        info!("Controller: track completed, advancing to {}", next);
        match self.play_at(&genre, songs, next, player) {
            Ok(response) => sink.emit(&response),
            Err(e) => sink.emit(&Response::error(e)),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Build the `STATUS` snapshot from the session and engine.
    pub fn status(&self, player: &impl PlaybackPort) -> Response {
        let s = &self.session;
        let loaded = s.has_songs();
        Response::Status {
            state: s.player_state(),
            genre: (!s.genre.is_empty()).then(|| s.genre.clone()),
            title: s.current_track().map(|t| t.title.clone()),
            index: loaded.then(|| to_u32(s.index)),
            total: loaded.then(|| to_u32(s.total())),
            volume: s.volume,
            position_ms: player.position_ms(),
            duration_ms: player.duration_ms(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// The track list for `genre`: the loaded one when it matches,
    /// otherwise a fresh catalog query.  Never empty.  Does not touch the
    /// session.
    fn tracks_for(&self, genre: &str, catalog: &impl CatalogPort) -> Result<Vec<Track>, DomainError> {
        if self.session.is_loaded(genre) {
            return Ok(self.session.songs.clone());
        }
        let songs = catalog.list_tracks(genre);
        if songs.is_empty() {
            return Err(DomainError::NoSongs {
                genre: genre.to_owned(),
            });
        }
        debug!("Controller: loaded {} tracks for {}", songs.len(), genre);
        Ok(songs)
    }

    /// Step from the current cursor.  A cursor left over from a longer
    /// list is clamped to the last track first.
    fn step(
        &mut self,
        genre: &str,
        step: Step,
        catalog: &impl CatalogPort,
        player: &mut impl PlaybackPort,
    ) -> Outcome {
        let songs = self.tracks_for(genre, catalog)?;
        let n = songs.len();
        let current = self.session.index.min(n - 1);
        let index = match step {
            Step::Forward => (current + 1) % n,
            Step::Backward => (current + n - 1) % n,
        };
        self.play_at(genre, songs, index, player).map(Some)
    }

    /// Commit the selection, then start the engine.  On a start failure
    /// the selection stays committed for a retry, but `playing` is false.
    fn play_at(
        &mut self,
        genre: &str,
        songs: Vec<Track>,
        index: usize,
        player: &mut impl PlaybackPort,
    ) -> Result<Response, Error> {
        let Some(track) = songs.get(index).cloned() else {
            return Err(DomainError::IndexOutOfRange {
                index: to_u32(index),
                total: songs.len(),
            }
            .into());
        };
        self.session.select(genre, songs, index);

        if let Err(e) = player.start(&track.locator) {
            warn!("Controller: cannot start '{}': {}", track.title, e);
            self.session.playing = false;
            self.session.current_title = None;
            return Err(e.into());
        }

        self.session.playing = true;
        self.session.current_title = Some(track.title.clone());
        info!(
            "Controller: playing {} [{}/{}] '{}'",
            genre,
            index + 1,
            self.session.total(),
            track.title
        );
        Ok(self.playing_response(&track.title, player))
    }

    fn pause(&mut self, player: &mut impl PlaybackPort) -> Outcome {
        if player.is_playing() {
            player.pause();
            self.session.playing = false;
            info!("Controller: paused");
            return Ok(Some(Response::Paused));
        }
        match self.config.pause_when_idle {
            PauseWhenIdle::Ignore => {
                debug!("Controller: pause while idle ignored");
                Ok(None)
            }
            PauseWhenIdle::Reject => Err(DomainError::NotPlaying.into()),
        }
    }

    fn resume(&mut self, player: &mut impl PlaybackPort) -> Result<Response, Error> {
        let title = self
            .session
            .current_track()
            .map(|t| t.title.clone())
            .ok_or(DomainError::NothingLoaded)?;

        if let Err(e) = player.resume() {
            self.session.playing = false;
            return Err(e.into());
        }
        self.session.playing = true;
        self.session.current_title = Some(title.clone());
        info!("Controller: resumed '{}'", title);
        Ok(self.playing_response(&title, player))
    }

    fn apply_volume(&mut self, level: i32, player: &mut impl PlaybackPort) -> Response {
        let level = level.clamp(0, 100) as u8;
        self.session.volume = level;
        player.set_volume(level);
        Response::Volume { level }
    }

    fn genres(&self, catalog: &impl CatalogPort) -> Response {
        let mut genres = catalog.list_genres();
        if genres.is_empty() && !self.config.fallback_genres.is_empty() {
            debug!("Controller: no genres discovered, using fallback list");
            genres.clone_from(&self.config.fallback_genres);
        }
        Response::Genres { genres }
    }

    fn playing_response(&self, title: &str, player: &impl PlaybackPort) -> Response {
        Response::Playing {
            genre: self.session.genre.clone(),
            title: title.to_owned(),
            index: to_u32(self.session.index),
            total: to_u32(self.session.total()),
            position_ms: player.position_ms(),
            duration_ms: player.duration_ms(),
        }
    }
}

fn progress(player: &impl PlaybackPort) -> Response {
    Response::Progress {
        current_ms: player.position_ms(),
        duration_ms: player.duration_ms(),
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
