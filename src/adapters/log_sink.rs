//! Log-based response sink adapter.
//!
//! Implements [`ResponseSink`] by writing every emitted response to the
//! `log` facade.  Hosts register it as a service observer to get a
//! human-readable trace of what subscribers were told.

use log::{info, warn};

use crate::app::ports::ResponseSink;
use crate::protocol::Response;

/// Adapter that logs every [`Response`].
#[derive(Debug, Default)]
pub struct LogResponseSink {
    emitted: u64,
}

impl LogResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responses logged so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl ResponseSink for LogResponseSink {
    fn emit(&mut self, response: &Response) {
        self.emitted += 1;
        match response {
            Response::Playing {
                genre,
                title,
                index,
                total,
                ..
            } => {
                info!("PLAY  | {} [{}/{}] {}", genre, index + 1, total, title);
            }
            Response::Paused => info!("PAUSE |"),
            Response::Stopped => info!("STOP  |"),
            Response::Status { state, volume, .. } => {
                info!("STATE | {} vol={}", state, volume);
            }
            Response::Error { message } => warn!("ERROR | {}", message),
            other => info!("SEND  | {}", other),
        }
    }
}
