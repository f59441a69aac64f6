//! Unified error types for the control protocol.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! service's error handling uniform.  None of these are fatal: each one is
//! surfaced as an `ERROR` response, a per-subscriber eviction, or a log line.

use core::fmt;

use crate::app::ports::{ConfigError, PlaybackError};
use crate::transport::TransportError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A wire string could not be decoded.
    Decode(DecodeError),
    /// A command is semantically invalid for the current session.
    Domain(DomainError),
    /// A subscriber transport rejected a send or a liveness link.
    Delivery(TransportError),
    /// The playback collaborator failed.
    Playback(PlaybackError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Domain(e) => write!(f, "{e}"),
            Self::Delivery(e) => write!(f, "delivery: {e}"),
            Self::Playback(e) => write!(f, "playback: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Why a wire string failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input was empty.
    Empty,
    /// The leading token is not a known keyword.
    UnknownKeyword(String),
    /// The second token is not valid for a multi-shaped keyword.
    UnknownVariant {
        keyword: &'static str,
        variant: String,
    },
    /// A required token is absent.
    MissingToken {
        keyword: &'static str,
        position: usize,
    },
    /// A numeric token did not parse.
    InvalidNumber {
        keyword: &'static str,
        token: String,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty message"),
            Self::UnknownKeyword(kw) => write!(f, "unknown keyword '{kw}'"),
            Self::UnknownVariant { keyword, variant } => {
                write!(f, "unknown {keyword} variant '{variant}'")
            }
            Self::MissingToken { keyword, position } => {
                write!(f, "{keyword}: missing token {position}")
            }
            Self::InvalidNumber { keyword, token } => {
                write!(f, "{keyword}: '{token}' is not a number")
            }
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// A command that cannot be executed against the current session.
///
/// The `Display` output is the human-readable message carried by the
/// `ERROR` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Content discovery returned no tracks for the genre.
    NoSongs { genre: String },
    /// No track title contains the requested name.
    TrackNotFound { genre: String, title: String },
    /// The requested index is past the end of the track list.
    IndexOutOfRange { index: u32, total: usize },
    /// The session has no loaded track.
    NothingLoaded,
    /// `PAUSE` while nothing is playing, under the reject policy.
    NotPlaying,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSongs { genre } => write!(f, "no songs in {genre}"),
            Self::TrackNotFound { genre, title } => write!(f, "'{title}' not found in {genre}"),
            Self::IndexOutOfRange { index, total } => {
                write!(f, "index {index} out of range (0..{total})")
            }
            Self::NothingLoaded => write!(f, "no current song"),
            Self::NotPlaying => write!(f, "not playing"),
        }
    }
}

impl From<DomainError> for Error {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Delivery(e)
    }
}

impl From<PlaybackError> for Error {
    fn from(e: PlaybackError) -> Self {
        Self::Playback(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
