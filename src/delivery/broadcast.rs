//! Fan-out of one encoded message to every registered subscriber.
//!
//! The broadcaster iterates a snapshot of the registry, sends to each
//! entry, and collects the identities whose send failed.  Evictions run
//! after the pass, so the collection being iterated is never mutated and
//! a failing subscriber never blocks delivery to the rest.

use std::sync::Arc;

use log::{debug, warn};

use crate::protocol::{ConnectionNotice, Response};
use crate::transport::SubscriberId;

use super::registry::SubscriberRegistry;

/// Outcome of a single broadcast pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers in the snapshot.
    pub attempted: usize,
    /// Successful sends.
    pub delivered: usize,
    /// Subscribers removed because their send failed.
    pub evicted: Vec<SubscriberId>,
}

impl BroadcastReport {
    pub fn all_delivered(&self) -> bool {
        self.delivered == self.attempted
    }
}

/// Sends messages to every subscriber of a registry.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Deliver `message` to every subscriber, then evict those that failed.
    pub fn broadcast(&self, message: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();

        self.registry.for_each(|id, transport| {
            report.attempted += 1;
            match transport.send(message) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("broadcast: send to {} failed: {}", id, e);
                    failed.push(id);
                }
            }
        });

        for id in failed {
            // A concurrent death notice may have removed it already.
            if self.registry.unregister(id) {
                report.evicted.push(id);
            }
        }

        debug!(
            "broadcast: {} delivered={}/{} evicted={}",
            message,
            report.delivered,
            report.attempted,
            report.evicted.len()
        );
        report
    }

    pub fn broadcast_response(&self, response: &Response) -> BroadcastReport {
        self.broadcast(&response.encode())
    }

    pub fn notify_connection(&self, notice: ConnectionNotice) -> BroadcastReport {
        self.broadcast(&notice.encode())
    }
}
