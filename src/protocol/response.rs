//! Outbound responses broadcast to every subscriber.
//!
//! Format: `TYPE|DATA1|DATA2|...`

use core::fmt;
use core::str::FromStr;

use crate::error::{DecodeError, DomainError};

use super::wire::{Tokens, WireWriter};

/// Volume reported by a `STATUS` message that omits the volume token.
const DEFAULT_STATUS_VOLUME: u8 = 100;

// ───────────────────────────────────────────────────────────────
// Player state label
// ───────────────────────────────────────────────────────────────

/// Derived transport state carried by `STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

impl PlayerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "PLAYING",
            Self::Paused => "PAUSED",
            Self::Stopped => "STOPPED",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "PLAYING" => Some(Self::Playing),
            "PAUSED" => Some(Self::Paused),
            "STOPPED" => Some(Self::Stopped),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───────────────────────────────────────────────────────────────
// Response
// ───────────────────────────────────────────────────────────────

/// Responses produced by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    // ── Playback status ───────────────────────────────────────
    Playing {
        genre: String,
        title: String,
        index: u32,
        total: u32,
        position_ms: u64,
        duration_ms: u64,
    },
    Paused,
    Stopped,
    Progress {
        current_ms: u64,
        duration_ms: u64,
    },

    // ── Listings ──────────────────────────────────────────────
    Playlist {
        genre: String,
        songs: Vec<String>,
    },
    Genres {
        genres: Vec<String>,
    },

    // ── Volume ────────────────────────────────────────────────
    Volume {
        level: u8,
    },

    // ── Status ────────────────────────────────────────────────
    /// Full snapshot.  `index` and `total` are either both present or
    /// both absent; an absent genre or title travels as an empty token.
    Status {
        state: PlayerState,
        genre: Option<String>,
        title: Option<String>,
        index: Option<u32>,
        total: Option<u32>,
        volume: u8,
        position_ms: u64,
        duration_ms: u64,
    },

    // ── Errors ────────────────────────────────────────────────
    Error {
        message: String,
    },

    // ── Health ────────────────────────────────────────────────
    Pong,
    Connection {
        connected: bool,
    },
}

impl Response {
    /// Error response for a genre with no tracks.
    pub fn no_songs(genre: &str) -> Self {
        Self::error(DomainError::NoSongs {
            genre: genre.to_owned(),
        })
    }

    /// Error response carrying `message`'s display text.
    pub fn error(message: impl fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Canonical wire form.
    pub fn encode(&self) -> String {
        match self {
            Self::Playing {
                genre,
                title,
                index,
                total,
                position_ms,
                duration_ms,
            } => WireWriter::new("PLAYING")
                .token(genre)
                .token(title)
                .number(*index)
                .number(*total)
                .number(*position_ms)
                .number(*duration_ms)
                .finish(),
            Self::Paused => WireWriter::new("PAUSED").finish(),
            Self::Stopped => WireWriter::new("STOPPED").finish(),
            Self::Progress {
                current_ms,
                duration_ms,
            } => WireWriter::new("PROGRESS")
                .number(*current_ms)
                .number(*duration_ms)
                .finish(),
            Self::Playlist { genre, songs } => WireWriter::new("PLAYLIST")
                .token(genre)
                .tokens(songs)
                .finish(),
            Self::Genres { genres } => WireWriter::new("GENRES").tokens(genres).finish(),
            Self::Volume { level } => WireWriter::new("VOLUME").number(*level).finish(),
            Self::Status {
                state,
                genre,
                title,
                index,
                total,
                volume,
                position_ms,
                duration_ms,
            } => WireWriter::new("STATUS")
                .token(state.as_str())
                .token(genre.as_deref().unwrap_or(""))
                .token(title.as_deref().unwrap_or(""))
                .number(index.unwrap_or(0))
                .number(total.unwrap_or(0))
                .number(*volume)
                .number(*position_ms)
                .number(*duration_ms)
                .finish(),
            Self::Error { message } => WireWriter::new("ERROR").token(message).finish(),
            Self::Pong => WireWriter::new("PONG").finish(),
            Self::Connection { connected } => WireWriter::new("CONNECTION")
                .token(if *connected { "connected" } else { "disconnected" })
                .finish(),
        }
    }

    /// Parse a wire string.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let t = Tokens::split(raw)?;

        match t.keyword() {
            "PONG" => Ok(Self::Pong),

            "PLAYING" => Ok(Self::Playing {
                genre: t.string("PLAYING", 1)?,
                title: t.string("PLAYING", 2)?,
                index: t.number("PLAYING", 3)?,
                total: t.number("PLAYING", 4)?,
                position_ms: t.number_or_none(5).unwrap_or(0),
                duration_ms: t.number_or_none(6).unwrap_or(0),
            }),

            "PAUSED" => Ok(Self::Paused),
            "STOPPED" => Ok(Self::Stopped),

            "PROGRESS" => Ok(Self::Progress {
                current_ms: t.number("PROGRESS", 1)?,
                duration_ms: t.number("PROGRESS", 2)?,
            }),

            "PLAYLIST" => Ok(Self::Playlist {
                genre: t.string("PLAYLIST", 1)?,
                songs: t.tail(2),
            }),

            "GENRES" => Ok(Self::Genres { genres: t.tail(1) }),

            "VOLUME" => Ok(Self::Volume {
                level: t.number("VOLUME", 1)?,
            }),

            "STATUS" => {
                let label = t.require("STATUS", 1)?;
                let state = PlayerState::parse(label).ok_or_else(|| DecodeError::UnknownVariant {
                    keyword: "STATUS",
                    variant: label.to_owned(),
                })?;
                let non_empty = |pos: usize| t.get(pos).filter(|s| !s.is_empty()).map(str::to_owned);
                let total: u32 = t.number_or_none(5).unwrap_or(0);
                let (index, total) = if total == 0 {
                    (None, None)
                } else {
                    (Some(t.number_or_none(4).unwrap_or(0)), Some(total))
                };
                Ok(Self::Status {
                    state,
                    genre: non_empty(2),
                    title: non_empty(3),
                    index,
                    total,
                    volume: t.number_or_none(6).unwrap_or(DEFAULT_STATUS_VOLUME),
                    position_ms: t.number_or_none(7).unwrap_or(0),
                    duration_ms: t.number_or_none(8).unwrap_or(0),
                })
            }

            "ERROR" => Ok(Self::Error {
                message: t.tail(1).join("|"),
            }),

            "CONNECTION" => Ok(Self::Connection {
                connected: t.get(1) == Some("connected"),
            }),

            other => Err(DecodeError::UnknownKeyword(other.to_owned())),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Response {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
