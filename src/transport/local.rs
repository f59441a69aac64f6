//! In-process transport.
//!
//! Delivers messages into an inbox owned by the subscriber.  Used for
//! local callers sharing the controller's process and as the test
//! double for every delivery path: sends can be made to fail and the
//! peer can be "killed", which fires its liveness watch like a remote
//! process crash would.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU64, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::debug;

use super::{DeathRecipient, SubscriberId, Transport, TransportError};

/// Identities handed out to local transports.  Starts high so they do not
/// collide with small hand-picked ids used by hosts.
static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1 << 32);

struct LocalState {
    inbox: Vec<String>,
    alive: bool,
    reject_sends: bool,
    reject_link: bool,
    recipient: Option<DeathRecipient>,
}

/// In-process subscriber endpoint.
pub struct LocalTransport {
    id: SubscriberId,
    state: Mutex<CriticalSectionRawMutex, RefCell<LocalState>>,
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTransport {
    /// Create an endpoint with a fresh identity.
    pub fn new() -> Self {
        Self::with_id(SubscriberId::new(
            NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed),
        ))
    }

    /// Create an endpoint with an explicit identity.
    pub fn with_id(id: SubscriberId) -> Self {
        Self {
            id,
            state: Mutex::new(RefCell::new(LocalState {
                inbox: Vec::new(),
                alive: true,
                reject_sends: false,
                reject_link: false,
                recipient: None,
            })),
        }
    }

    /// Every message received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.state.lock(|s| s.borrow().inbox.clone())
    }

    /// Drain the inbox.
    pub fn take_messages(&self) -> Vec<String> {
        self.state
            .lock(|s| core::mem::take(&mut s.borrow_mut().inbox))
    }

    /// Make subsequent sends fail (the peer stays "alive").
    pub fn fail_sends(&self, fail: bool) {
        self.state.lock(|s| s.borrow_mut().reject_sends = fail);
    }

    /// Make subsequent liveness links fail.
    pub fn fail_link(&self, fail: bool) {
        self.state.lock(|s| s.borrow_mut().reject_link = fail);
    }

    pub fn is_alive(&self) -> bool {
        self.state.lock(|s| s.borrow().alive)
    }

    /// Whether a liveness watch is currently linked.
    pub fn is_linked(&self) -> bool {
        self.state.lock(|s| s.borrow().recipient.is_some())
    }

    /// Simulate the peer process dying: further sends fail and the linked
    /// death recipient (if any) is notified.
    pub fn kill(&self) {
        let recipient = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.alive = false;
            s.recipient.take()
        });
        // Notify outside the lock: the recipient re-enters the registry.
        if let Some(r) = recipient {
            debug!("local transport {}: peer died", self.id);
            r.binder_died();
        }
    }
}

impl Transport for LocalTransport {
    fn identity(&self) -> SubscriberId {
        self.id
    }

    fn send(&self, message: &str) -> Result<(), TransportError> {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            if !s.alive {
                return Err(TransportError::Disconnected);
            }
            if s.reject_sends {
                return Err(TransportError::Rejected("send refused by peer".into()));
            }
            s.inbox.push(message.to_owned());
            Ok(())
        })
    }

    fn link_to_death(&self, recipient: DeathRecipient) -> Result<(), TransportError> {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            if !s.alive || s.reject_link {
                return Err(TransportError::LinkFailed);
            }
            s.recipient = Some(recipient);
            Ok(())
        })
    }

    fn unlink_to_death(&self) {
        self.state.lock(|s| s.borrow_mut().recipient = None);
    }
}
