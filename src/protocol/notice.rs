//! Registration notices and subscriber-side message classification.
//!
//! Registration and deregistration are announced on a separate channel,
//! `CONNECTION:<status>`, which shares the delivery primitive with
//! responses but not their grammar (note the `:` instead of `|`).

use core::fmt;

use super::response::Response;

const NOTICE_PREFIX: &str = "CONNECTION:";
const PONG: &str = "PONG";

/// A `CONNECTION:<status>` notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionNotice {
    Connected,
    Disconnected,
}

impl ConnectionNotice {
    pub fn status(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    pub fn encode(self) -> String {
        format!("{NOTICE_PREFIX}{}", self.status())
    }

    /// Parse a notice.  Any status other than `connected` reads as
    /// `Disconnected`; input without the prefix is not a notice.
    pub fn decode(raw: &str) -> Option<Self> {
        let status = raw.strip_prefix(NOTICE_PREFIX)?;
        Some(if status == "connected" {
            Self::Connected
        } else {
            Self::Disconnected
        })
    }
}

impl fmt::Display for ConnectionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NOTICE_PREFIX}{}", self.status())
    }
}

/// What a subscriber received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Registration notice.
    Notice(ConnectionNotice),
    /// Health probe answer.
    Pong,
    /// Any other well-formed response.
    Response(Response),
    /// A message that neither grammar accepts.
    Unrecognized(String),
}

impl Inbound {
    pub fn classify(raw: &str) -> Self {
        if let Some(notice) = ConnectionNotice::decode(raw) {
            return Self::Notice(notice);
        }
        if raw == PONG {
            return Self::Pong;
        }
        match Response::decode(raw) {
            Ok(response) => Self::Response(response),
            Err(_) => Self::Unrecognized(raw.to_owned()),
        }
    }
}
