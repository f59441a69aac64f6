//! Transport abstraction: any channel that can carry a message to one
//! subscriber.
//!
//! Concrete implementations:
//! - [`local::LocalTransport`]: in-process inbox (tests, local callers)
//! - [`NullTransport`]: discards everything
//! - host-provided adapters over sockets, named pipes or binder handles
//!
//! The registry and broadcaster are generic over `Transport`, so adding
//! a new IPC substrate requires zero changes to the delivery logic.

pub mod local;

use core::fmt;
use std::sync::{Arc, Weak};

use crate::delivery::registry::SubscriberRegistry;

/// Opaque, comparable subscriber identity derived from a transport handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a transport operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote endpoint is gone.
    Disconnected,
    /// The remote endpoint refused the message.
    Rejected(String),
    /// The liveness watch could not be established.
    LinkFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "peer disconnected"),
            Self::Rejected(reason) => write!(f, "send rejected: {reason}"),
            Self::LinkFailed => write!(f, "liveness link failed"),
        }
    }
}

/// Message channel to a single subscriber.
pub trait Transport: Send + Sync {
    /// Stable identity of the remote endpoint.  Two handles to the same
    /// endpoint must report the same identity.
    fn identity(&self) -> SubscriberId;

    /// Deliver one message.  Must not block indefinitely.
    fn send(&self, message: &str) -> Result<(), TransportError>;

    /// Arrange for `recipient` to be notified, from any thread, when the
    /// remote endpoint becomes unreachable.
    fn link_to_death(&self, recipient: DeathRecipient) -> Result<(), TransportError>;

    /// Cancel a previously linked watch.  Must tolerate being called when
    /// no watch is linked.
    fn unlink_to_death(&self);
}

/// Liveness-watch token handed to [`Transport::link_to_death`].
///
/// Holds only a weak reference to the registry that issued it, so a
/// notice arriving after the registry is dropped is a no-op.
#[derive(Clone)]
pub struct DeathRecipient {
    id: SubscriberId,
    registry: Weak<SubscriberRegistry>,
}

impl DeathRecipient {
    pub(crate) fn new(id: SubscriberId, registry: &Arc<SubscriberRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    pub fn subscriber(&self) -> SubscriberId {
        self.id
    }

    /// Report that the remote endpoint died.
    pub fn binder_died(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.on_peer_died(self.id);
        }
    }
}

impl fmt::Debug for DeathRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeathRecipient")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A null transport that discards all messages and never dies.
/// Useful as a placeholder subscriber.
pub struct NullTransport {
    id: SubscriberId,
}

impl NullTransport {
    pub fn new(id: SubscriberId) -> Self {
        Self { id }
    }
}

impl Transport for NullTransport {
    fn identity(&self) -> SubscriberId {
        self.id
    }

    fn send(&self, _message: &str) -> Result<(), TransportError> {
        Ok(())
    }

    fn link_to_death(&self, _recipient: DeathRecipient) -> Result<(), TransportError> {
        Ok(())
    }

    fn unlink_to_death(&self) {}
}
