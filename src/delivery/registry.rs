//! Subscriber registry.
//!
//! Tracks connected subscribers, de-duplicates them by identity and
//! removes them on explicit unregister, on a liveness notice, or when the
//! broadcaster evicts them after a failed send.
//!
//! Mutations may arrive from any thread (death notices are delivered by
//! the transport layer), so the entry list lives behind an
//! `embassy-sync` blocking mutex.  Transports are never called while the
//! lock is held.  Count changes are published on a bounded lifecycle
//! channel that the service drains on its own thread:
//!
//! ```text
//! ┌───────────────┐  RegistryEvent  ┌───────────────┐
//! │ any thread    │────────────────▶│ ControlService │
//! │ (register,    │                 │ (drain_events) │
//! │  death, evict)│                 └───────────────┘
//! └───────────────┘
//! ```

use core::cell::RefCell;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, info, warn};

use crate::error::Result;
use crate::transport::{DeathRecipient, SubscriberId, Transport};

/// Channel depth for lifecycle events.
pub const EVENT_DEPTH: usize = 32;

/// Outcome of [`SubscriberRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// New entry; `count` is the subscriber count after insertion.
    Accepted { id: SubscriberId, count: usize },
    /// The identity was already registered; nothing changed.
    AlreadyPresent { id: SubscriberId },
}

/// Subscriber count change, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    Connected { id: SubscriberId, count: usize },
    Disconnected { id: SubscriberId, remaining: usize },
}

struct SubscriberEntry {
    id: SubscriberId,
    transport: Arc<dyn Transport>,
}

/// Thread-safe set of subscribers, at most one per identity.
pub struct SubscriberRegistry {
    entries: Mutex<CriticalSectionRawMutex, RefCell<Vec<SubscriberEntry>>>,
    events: Channel<CriticalSectionRawMutex, RegistryEvent, EVENT_DEPTH>,
}

impl SubscriberRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(RefCell::new(Vec::new())),
            events: Channel::new(),
        })
    }

    /// Register a subscriber and link its liveness watch.
    ///
    /// A duplicate identity is logged and reported as
    /// [`Registration::AlreadyPresent`], not as an error.  Fails only when
    /// the liveness watch cannot be linked.
    pub fn register(self: &Arc<Self>, transport: Arc<dyn Transport>) -> Result<Registration> {
        let id = transport.identity();

        if self.contains(id) {
            warn!("registry: subscriber {} already registered", id);
            return Ok(Registration::AlreadyPresent { id });
        }

        if let Err(e) = transport.link_to_death(DeathRecipient::new(id, self)) {
            warn!("registry: liveness link for {} failed: {}", id, e);
            return Err(e.into());
        }

        let inserted = self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            if entries.iter().any(|e| e.id == id) {
                return None;
            }
            entries.push(SubscriberEntry {
                id,
                transport: Arc::clone(&transport),
            });
            Some(entries.len())
        });

        match inserted {
            Some(count) => {
                info!("registry: subscriber {} connected, total {}", id, count);
                self.publish(RegistryEvent::Connected { id, count });
                Ok(Registration::Accepted { id, count })
            }
            None => {
                warn!("registry: subscriber {} registered concurrently", id);
                transport.unlink_to_death();
                Ok(Registration::AlreadyPresent { id })
            }
        }
    }

    /// Remove a subscriber.  Returns `false` if it was not registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let removed = self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            let pos = entries.iter().position(|e| e.id == id)?;
            let entry = entries.remove(pos);
            Some((entry, entries.len()))
        });

        let Some((entry, remaining)) = removed else {
            debug!("registry: unregister of unknown subscriber {}", id);
            return false;
        };

        entry.transport.unlink_to_death();
        info!("registry: subscriber {} disconnected, total {}", id, remaining);
        self.publish(RegistryEvent::Disconnected { id, remaining });
        true
    }

    /// Liveness notice from the transport layer.
    pub(crate) fn on_peer_died(&self, id: SubscriberId) {
        info!("registry: subscriber {} died", id);
        self.unregister(id);
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.entries
            .lock(|cell| cell.borrow().iter().any(|e| e.id == id))
    }

    /// Authoritative subscriber count.
    pub fn count(&self) -> usize {
        self.entries.lock(|cell| cell.borrow().len())
    }

    /// Stable copy of the current entries, in registration order.
    pub fn snapshot(&self) -> Vec<(SubscriberId, Arc<dyn Transport>)> {
        self.entries.lock(|cell| {
            cell.borrow()
                .iter()
                .map(|e| (e.id, Arc::clone(&e.transport)))
                .collect()
        })
    }

    /// Visit every subscriber.  Iterates a snapshot, so the visitor may
    /// register or unregister freely.
    pub fn for_each(&self, mut visitor: impl FnMut(SubscriberId, &dyn Transport)) {
        for (id, transport) in self.snapshot() {
            visitor(id, transport.as_ref());
        }
    }

    /// Drain pending lifecycle events in FIFO order.
    pub fn drain_events(&self, mut handler: impl FnMut(RegistryEvent)) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.events.try_receive() {
            handler(event);
            drained += 1;
        }
        drained
    }

    /// Drop every subscriber without publishing events (shutdown).
    /// Returns how many were removed.
    pub fn clear(&self) -> usize {
        let drained = self
            .entries
            .lock(|cell| core::mem::take(&mut *cell.borrow_mut()));
        for entry in &drained {
            entry.transport.unlink_to_death();
        }
        if !drained.is_empty() {
            info!("registry: cleared {} subscribers", drained.len());
        }
        drained.len()
    }

    fn publish(&self, event: RegistryEvent) {
        if self.events.try_send(event).is_err() {
            warn!("registry: lifecycle channel full, dropping {:?}", event);
        }
    }
}
