//! Subscriber-side client helper.
//!
//! [`RemoteClient`] sits on the subscriber end of a [`CommandLink`].  It
//! tracks the connection state, classifies every inbound message and
//! offers typed shortcuts for each command.
//!
//! ```text
//!           connect()                 CONNECTION:connected / PONG
//!  Disconnected ──▶ Connecting ──▶ Connected ◀──────────────────────┐
//!       ▲               │              │                             │
//!       │          link failed    send failed                        │
//!       │               ▼              ▼                             │
//!       └─ disconnect() ─────────── Error ───────────────────────────┘
//! ```

use core::fmt;

use log::{debug, info, warn};

use crate::protocol::{Command, ConnectionNotice, Inbound, Response};
use crate::transport::TransportError;

/// Where a client stands with respect to the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// The client's half of the command channel.
pub trait CommandLink {
    /// Bind to the controller and register as a subscriber.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Deliver one raw command string.
    fn send_command(&mut self, raw: &str) -> Result<(), TransportError>;

    /// Unregister and release the binding.  Must tolerate repeated calls.
    fn disconnect(&mut self);
}

pub struct RemoteClient<L: CommandLink> {
    link: L,
    state: ConnectionState,
    bound: bool,
    last_message: Option<String>,
    last_response: Option<Response>,
}

impl<L: CommandLink> RemoteClient<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            state: ConnectionState::Disconnected,
            bound: false,
            last_message: None,
            last_response: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Raw text of the last non-control message.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Last message that parsed as a [`Response`].
    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    // ── Connection ────────────────────────────────────────────

    pub fn connect(&mut self) {
        if self.bound {
            debug!("RemoteClient: already connected");
            return;
        }
        self.set_state(ConnectionState::Connecting);
        match self.link.connect() {
            Ok(()) => {
                self.bound = true;
                self.set_state(ConnectionState::Connected);
            }
            Err(e) => {
                warn!("RemoteClient: connect failed: {}", e);
                self.set_state(ConnectionState::Error);
            }
        }
    }

    pub fn disconnect(&mut self) {
        if !self.bound {
            debug!("RemoteClient: already disconnected");
            return;
        }
        self.link.disconnect();
        self.bound = false;
        self.set_state(ConnectionState::Disconnected);
    }

    /// The controller went away without a `disconnect()` from this side.
    pub fn on_link_lost(&mut self) {
        self.bound = false;
        self.set_state(ConnectionState::Disconnected);
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Classify one message delivered by the controller.
    ///
    /// Connection notices and `PONG` only update the connection state;
    /// everything else is recorded as the last message.
    pub fn on_message(&mut self, raw: &str) -> Inbound {
        let inbound = Inbound::classify(raw);
        match &inbound {
            Inbound::Notice(ConnectionNotice::Connected) | Inbound::Pong => {
                self.set_state(ConnectionState::Connected);
            }
            Inbound::Notice(ConnectionNotice::Disconnected) => {
                self.set_state(ConnectionState::Disconnected);
            }
            Inbound::Response(response) => {
                self.last_message = Some(raw.to_owned());
                self.last_response = Some(response.clone());
            }
            Inbound::Unrecognized(_) => {
                warn!("RemoteClient: unrecognized message '{}'", raw);
                self.last_message = Some(raw.to_owned());
            }
        }
        inbound
    }

    // ── Outbound ──────────────────────────────────────────────

    /// Send a raw command.  A link failure moves the client to `Error`.
    pub fn send_raw(&mut self, raw: &str) -> Result<(), TransportError> {
        if !self.bound {
            warn!("RemoteClient: not connected, dropping '{}'", raw);
            return Err(TransportError::Disconnected);
        }
        debug!("RemoteClient: sending '{}'", raw);
        self.link.send_command(raw).inspect_err(|e| {
            warn!("RemoteClient: send failed: {}", e);
            self.set_state(ConnectionState::Error);
        })
    }

    pub fn send(&mut self, cmd: &Command) -> Result<(), TransportError> {
        self.send_raw(&cmd.encode())
    }

    // ── Shortcuts ─────────────────────────────────────────────

    pub fn play_song(&mut self, genre: &str, title: &str) -> Result<(), TransportError> {
        self.send(&Command::PlaySong {
            genre: genre.to_owned(),
            title: title.to_owned(),
        })
    }

    pub fn play_genre(&mut self, genre: &str) -> Result<(), TransportError> {
        self.send(&Command::PlayGenre {
            genre: genre.to_owned(),
        })
    }

    pub fn play_index(&mut self, genre: &str, index: u32) -> Result<(), TransportError> {
        self.send(&Command::PlayIndex {
            genre: genre.to_owned(),
            index,
        })
    }

    pub fn pause(&mut self) -> Result<(), TransportError> {
        self.send(&Command::Pause)
    }

    pub fn resume(&mut self) -> Result<(), TransportError> {
        self.send(&Command::Resume)
    }

    pub fn stop(&mut self) -> Result<(), TransportError> {
        self.send(&Command::Stop)
    }

    pub fn next(&mut self, genre: &str) -> Result<(), TransportError> {
        self.send(&Command::Next {
            genre: genre.to_owned(),
        })
    }

    pub fn previous(&mut self, genre: &str) -> Result<(), TransportError> {
        self.send(&Command::Previous {
            genre: genre.to_owned(),
        })
    }

    pub fn set_volume(&mut self, level: i32) -> Result<(), TransportError> {
        self.send(&Command::SetVolume { level })
    }

    pub fn volume_up(&mut self) -> Result<(), TransportError> {
        self.send(&Command::VolumeUp)
    }

    pub fn volume_down(&mut self) -> Result<(), TransportError> {
        self.send(&Command::VolumeDown)
    }

    pub fn seek_to(&mut self, position_ms: u64) -> Result<(), TransportError> {
        self.send(&Command::SeekTo { position_ms })
    }

    pub fn get_playlist(&mut self, genre: &str) -> Result<(), TransportError> {
        self.send(&Command::GetPlaylist {
            genre: genre.to_owned(),
        })
    }

    pub fn get_current_song(&mut self) -> Result<(), TransportError> {
        self.send(&Command::GetCurrentSong)
    }

    pub fn get_status(&mut self) -> Result<(), TransportError> {
        self.send(&Command::GetStatus)
    }

    pub fn get_genres(&mut self) -> Result<(), TransportError> {
        self.send(&Command::GetGenres)
    }

    pub fn get_progress(&mut self) -> Result<(), TransportError> {
        self.send(&Command::GetProgress)
    }

    pub fn ping(&mut self) -> Result<(), TransportError> {
        self.send(&Command::Ping)
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            info!("RemoteClient: {} -> {}", self.state, state);
            self.state = state;
        }
    }
}
