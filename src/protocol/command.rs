//! Inbound commands.
//!
//! These represent control requests issued by a remote subscriber (or a
//! local shortcut caller) that the [`Controller`](crate::app::controller::Controller)
//! interprets and acts upon.
//!
//! Format: `ACTION|RESOURCE|PARAM1|PARAM2|...`

use core::fmt;
use core::str::FromStr;

use crate::error::DecodeError;

use super::wire::{Tokens, WireWriter};

/// Commands a remote peer can send to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Health probe; answered with `PONG`.
    Ping,

    /// Play the first track of `genre` whose title contains `title`.
    PlaySong { genre: String, title: String },
    /// Play `genre` from its first track.
    PlayGenre { genre: String },
    /// Play the track at `index` within `genre`.
    PlayIndex { genre: String, index: u32 },

    Pause,
    Resume,
    Stop,

    /// Advance to the next track (wraps around).
    Next { genre: String },
    /// Step back to the previous track (wraps around).
    Previous { genre: String },

    /// Set the output volume.  Levels outside 0–100 are clamped when applied.
    SetVolume { level: i32 },
    VolumeUp,
    VolumeDown,

    /// Seek within the current track.
    SeekTo { position_ms: u64 },

    /// List the tracks of `genre`.
    GetPlaylist { genre: String },
    GetCurrentSong,
    GetStatus,
    GetGenres,
    GetProgress,
}

impl Command {
    /// Canonical wire form.  Total and deterministic.
    pub fn encode(&self) -> String {
        match self {
            Self::Ping => WireWriter::new("PING").finish(),
            Self::PlaySong { genre, title } => WireWriter::new("PLAY")
                .token("SONG")
                .token(genre)
                .token(title)
                .finish(),
            Self::PlayGenre { genre } => WireWriter::new("PLAY").token("GENRE").token(genre).finish(),
            Self::PlayIndex { genre, index } => WireWriter::new("PLAY")
                .token("INDEX")
                .token(genre)
                .number(*index)
                .finish(),
            Self::Pause => WireWriter::new("PAUSE").token("PLAYBACK").finish(),
            Self::Resume => WireWriter::new("RESUME").token("PLAYBACK").finish(),
            Self::Stop => WireWriter::new("STOP").token("PLAYBACK").finish(),
            Self::Next { genre } => WireWriter::new("NEXT").token("GENRE").token(genre).finish(),
            Self::Previous { genre } => WireWriter::new("PREV").token("GENRE").token(genre).finish(),
            Self::SetVolume { level } => WireWriter::new("VOLUME")
                .token("SET")
                .token(&level.to_string())
                .finish(),
            Self::VolumeUp => WireWriter::new("VOLUME").token("UP").finish(),
            Self::VolumeDown => WireWriter::new("VOLUME").token("DOWN").finish(),
            Self::SeekTo { position_ms } => WireWriter::new("SEEK")
                .token("POSITION")
                .number(*position_ms)
                .finish(),
            Self::GetPlaylist { genre } => WireWriter::new("GET").token("PLAYLIST").token(genre).finish(),
            Self::GetCurrentSong => WireWriter::new("GET").token("CURRENT_SONG").finish(),
            Self::GetStatus => WireWriter::new("GET").token("STATUS").finish(),
            Self::GetGenres => WireWriter::new("GET").token("GENRES").finish(),
            Self::GetProgress => WireWriter::new("GET").token("PROGRESS").finish(),
        }
    }

    /// Parse a wire string.  Pure; never panics on malformed input.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let t = Tokens::split(raw)?;

        match t.keyword() {
            "PING" => Ok(Self::Ping),

            "PLAY" => {
                let variant = t.require("PLAY", 1)?;
                match variant {
                    "SONG" => Ok(Self::PlaySong {
                        genre: t.string("PLAY", 2)?,
                        title: t.string("PLAY", 3)?,
                    }),
                    "GENRE" => Ok(Self::PlayGenre {
                        genre: t.string("PLAY", 2)?,
                    }),
                    "INDEX" => Ok(Self::PlayIndex {
                        genre: t.string("PLAY", 2)?,
                        index: t.number("PLAY", 3)?,
                    }),
                    other => Err(DecodeError::UnknownVariant {
                        keyword: "PLAY",
                        variant: other.to_owned(),
                    }),
                }
            }

            "PAUSE" => Ok(Self::Pause),
            "RESUME" => Ok(Self::Resume),
            "STOP" => Ok(Self::Stop),

            "NEXT" => Ok(Self::Next {
                genre: t.string("NEXT", 2)?,
            }),
            "PREV" => Ok(Self::Previous {
                genre: t.string("PREV", 2)?,
            }),

            "VOLUME" => {
                let variant = t.require("VOLUME", 1)?;
                match variant {
                    "SET" => Ok(Self::SetVolume {
                        level: t.number("VOLUME", 2)?,
                    }),
                    "UP" => Ok(Self::VolumeUp),
                    "DOWN" => Ok(Self::VolumeDown),
                    other => Err(DecodeError::UnknownVariant {
                        keyword: "VOLUME",
                        variant: other.to_owned(),
                    }),
                }
            }

            "SEEK" => Ok(Self::SeekTo {
                position_ms: t.number("SEEK", 2)?,
            }),

            "GET" => {
                let variant = t.require("GET", 1)?;
                match variant {
                    "PLAYLIST" => Ok(Self::GetPlaylist {
                        genre: t.string("GET", 2)?,
                    }),
                    "CURRENT_SONG" => Ok(Self::GetCurrentSong),
                    "STATUS" => Ok(Self::GetStatus),
                    "GENRES" => Ok(Self::GetGenres),
                    "PROGRESS" => Ok(Self::GetProgress),
                    other => Err(DecodeError::UnknownVariant {
                        keyword: "GET",
                        variant: other.to_owned(),
                    }),
                }
            }

            other => Err(DecodeError::UnknownKeyword(other.to_owned())),
        }
    }

    /// Short label for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "Ping",
            Self::PlaySong { .. } => "PlaySong",
            Self::PlayGenre { .. } => "PlayGenre",
            Self::PlayIndex { .. } => "PlayIndex",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Stop => "Stop",
            Self::Next { .. } => "Next",
            Self::Previous { .. } => "Previous",
            Self::SetVolume { .. } => "SetVolume",
            Self::VolumeUp => "VolumeUp",
            Self::VolumeDown => "VolumeDown",
            Self::SeekTo { .. } => "SeekTo",
            Self::GetPlaylist { .. } => "GetPlaylist",
            Self::GetCurrentSong => "GetCurrentSong",
            Self::GetStatus => "GetStatus",
            Self::GetGenres => "GetGenres",
            Self::GetProgress => "GetProgress",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Command {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
