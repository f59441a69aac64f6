//! Port traits: the boundary between the controller and its host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (content discovery, playback engine, response sinks,
//! config storage) implement these traits.  The
//! [`Controller`](super::controller::Controller) consumes them via
//! generics, so the domain core never touches a filesystem or an audio
//! device directly.
//!
//! All port errors are typed; callers must handle every variant.

use core::fmt;

use crate::config::ControllerConfig;
use crate::protocol::Response;

// ───────────────────────────────────────────────────────────────
// Content discovery (driven adapter: library → domain)
// ───────────────────────────────────────────────────────────────

/// One playable item.  The controller treats `locator` as opaque and
/// only hands it back to [`PlaybackPort::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub locator: String,
}

impl Track {
    pub fn new(title: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            locator: locator.into(),
        }
    }
}

/// Read-side port for the media library.
///
/// Discovery failures are the adapter's problem: they are logged there
/// and surface here as an empty listing.
pub trait CatalogPort {
    /// Every genre, in presentation order.
    fn list_genres(&self) -> Vec<String>;

    /// Tracks of `genre`, in play order.  Unknown genre → empty.
    fn list_tracks(&self, genre: &str) -> Vec<Track>;
}

// ───────────────────────────────────────────────────────────────
// Playback (driven adapter: domain → audio engine)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the physical playback engine.
///
/// Implementations bound their own blocking calls; the controller
/// assumes every method returns promptly.
pub trait PlaybackPort {
    /// Load and start `locator` from the beginning.
    fn start(&mut self, locator: &str) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Continue the loaded track.
    fn resume(&mut self) -> Result<(), PlaybackError>;

    /// Stop and unload.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Position within the loaded track, 0 when nothing is loaded.
    fn position_ms(&self) -> u64;

    /// Length of the loaded track, 0 when unknown.
    fn duration_ms(&self) -> u64;

    fn seek_to(&mut self, position_ms: u64) -> Result<(), PlaybackError>;

    /// Output level, already clamped to 0–100.
    fn set_volume(&mut self, level: u8);
}

// ───────────────────────────────────────────────────────────────
// Response sink (driven adapter: domain → subscribers / logs)
// ───────────────────────────────────────────────────────────────

/// The controller emits every [`Response`] through this port.  Adapters
/// decide where it goes (broadcast to subscribers, log, test capture).
pub trait ResponseSink {
    fn emit(&mut self, response: &Response);
}

impl ResponseSink for Vec<Response> {
    fn emit(&mut self, response: &Response) {
        self.push(response.clone());
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate before persisting.  Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ControllerConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<ControllerConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PlaybackPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The engine could not open or decode the locator.
    Unplayable { locator: String, reason: String },
    /// The operation needs a loaded track.
    NothingLoaded,
    /// The engine itself failed.
    Engine(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unplayable { locator, reason } => write!(f, "cannot play {locator}: {reason}"),
            Self::NothingLoaded => write!(f, "nothing loaded"),
            Self::Engine(reason) => write!(f, "engine failure: {reason}"),
        }
    }
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first start).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
