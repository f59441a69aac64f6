//! Control service: the entry point hosts talk to.
//!
//! [`ControlService`] wires the [`Controller`] to its ports, the
//! [`SubscriberRegistry`] and the [`Broadcaster`].  It is driven from a
//! single thread (`&mut self`); the registry is the only piece shared
//! with other threads, through the transport layer's death notices.
//!
//! ```text
//!  raw command ──▶ send_command ──▶ Controller ──▶ Fanout ──┬──▶ Broadcaster ──▶ subscribers
//!                                                           └──▶ observers (local mirrors)
//!
//!  register_subscriber ──▶ SubscriberRegistry ──▶ RegistryEvent ──▶ process_lifecycle_events
//!  DeathRecipient (any thread) ──────┘
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::app::controller::Controller;
use crate::app::ports::{CatalogPort, ConfigPort, PlaybackPort, ResponseSink};
use crate::app::session::SessionState;
use crate::config::ControllerConfig;
use crate::delivery::{Broadcaster, Registration, RegistryEvent, SubscriberRegistry};
use crate::error::Result;
use crate::protocol::{Command, ConnectionNotice, Response};
use crate::transport::{SubscriberId, Transport};

/// Raw health probe, answered without decoding or content logging.
const PING: &str = "PING";

/// Message carried by the `ERROR` response for undecodable input.
pub const UNKNOWN_COMMAND: &str = "unknown command";

type Observer = Box<dyn ResponseSink + Send>;

// ───────────────────────────────────────────────────────────────
// Fan-out sink
// ───────────────────────────────────────────────────────────────

/// Delivers each response to every subscriber, then to local observers.
struct Fanout<'a> {
    broadcaster: &'a Broadcaster,
    observers: &'a mut [Observer],
}

impl ResponseSink for Fanout<'_> {
    fn emit(&mut self, response: &Response) {
        self.broadcaster.broadcast_response(response);
        for observer in self.observers.iter_mut() {
            observer.emit(response);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService<C: CatalogPort, P: PlaybackPort> {
    controller: Controller,
    catalog: C,
    player: P,
    registry: Arc<SubscriberRegistry>,
    broadcaster: Broadcaster,
    observers: Vec<Observer>,
    last_command: Option<String>,
    /// Subscribers that already received push-on-join.
    greeted: HashSet<SubscriberId>,
    /// Subscriber count as last reported to the controller.
    known_count: usize,
}

impl<C: CatalogPort, P: PlaybackPort> ControlService<C, P> {
    pub fn new(config: ControllerConfig, catalog: C, mut player: P) -> Self {
        let controller = Controller::new(config);
        player.set_volume(controller.session().volume);
        let registry = SubscriberRegistry::new();
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        info!("ControlService: started");
        Self {
            controller,
            catalog,
            player,
            registry,
            broadcaster,
            observers: Vec::new(),
            last_command: None,
            greeted: HashSet::new(),
            known_count: 0,
        }
    }

    /// Build a service from stored configuration.  A missing store yields
    /// the defaults; a corrupt or invalid one is an [`Error::Config`].
    ///
    /// [`Error::Config`]: crate::error::Error::Config
    pub fn from_storage(storage: &impl ConfigPort, catalog: C, player: P) -> Result<Self> {
        let config = storage.load()?;
        config.validate()?;
        Ok(Self::new(config, catalog, player))
    }

    // ── Commands ──────────────────────────────────────────────

    /// Handle one raw command string from a subscriber.
    ///
    /// `PING` is answered with `PONG` straight away.  Anything that does
    /// not decode is answered with `ERROR|unknown command` and leaves the
    /// session untouched.
    pub fn send_command(&mut self, raw: &str) {
        self.process_lifecycle_events();

        if raw == PING {
            debug!("ControlService: ping");
            self.emit(&Response::Pong);
            return;
        }

        info!("ControlService: command '{}'", raw);
        self.last_command = Some(raw.to_owned());
        match Command::decode(raw) {
            Ok(cmd) => self.dispatch(&cmd),
            Err(e) => {
                warn!("ControlService: cannot decode '{}': {}", raw, e);
                self.emit(&Response::error(UNKNOWN_COMMAND));
            }
        }
    }

    /// Typed entry point for local callers.
    pub fn execute(&mut self, cmd: &Command) {
        self.process_lifecycle_events();
        if *cmd != Command::Ping {
            self.last_command = Some(cmd.encode());
        }
        self.dispatch(cmd);
    }

    /// The engine finished the current track.
    pub fn on_track_completed(&mut self) {
        self.process_lifecycle_events();
        let mut fanout = Fanout {
            broadcaster: &self.broadcaster,
            observers: &mut self.observers,
        };
        self.controller
            .on_track_completed(&mut self.player, &mut fanout);
    }

    // ── Subscribers ───────────────────────────────────────────

    /// Register a subscriber.  A new one receives `GENRES` and `STATUS`,
    /// then every subscriber receives `CONNECTION:connected`.
    ///
    /// The join is handled from the registration result, so it does not
    /// depend on the lifecycle channel having room for the event.
    pub fn register_subscriber(&mut self, transport: Arc<dyn Transport>) -> Result<Registration> {
        self.process_lifecycle_events();
        let registration = self.registry.register(transport)?;
        if let Registration::Accepted { id, count } = registration {
            self.greet(id, count);
        }
        self.process_lifecycle_events();
        Ok(registration)
    }

    pub fn unregister_subscriber(&mut self, id: SubscriberId) -> bool {
        let removed = self.registry.unregister(id);
        self.process_lifecycle_events();
        removed
    }

    /// Apply queued registry events (joins, explicit leaves, deaths,
    /// evictions), then reconcile with the registry in case events were
    /// dropped.  Returns how many events were handled.
    pub fn process_lifecycle_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let mut pending = Vec::new();
            self.registry.drain_events(|e| pending.push(e));
            if pending.is_empty() {
                break;
            }
            handled += pending.len();
            for event in pending {
                self.on_registry_event(event);
            }
        }
        self.reconcile();
        handled
    }

    fn on_registry_event(&mut self, event: RegistryEvent) {
        match event {
            RegistryEvent::Connected { id, count } => {
                if self.greeted.contains(&id) {
                    return;
                }
                if !self.registry.contains(id) {
                    debug!("ControlService: {} left before join was handled", id);
                    return;
                }
                self.greet(id, count);
            }
            RegistryEvent::Disconnected { id, remaining } => {
                self.greeted.remove(&id);
                self.known_count = remaining;
                self.controller.on_subscriber_disconnected(remaining);
            }
        }
    }

    /// Push-on-join for `id`, then the connection notice to everyone.
    fn greet(&mut self, id: SubscriberId, count: usize) {
        self.greeted.insert(id);
        self.known_count = count;
        let mut fanout = Fanout {
            broadcaster: &self.broadcaster,
            observers: &mut self.observers,
        };
        self.controller
            .on_subscriber_connected(count, &self.catalog, &self.player, &mut fanout);
        self.broadcaster
            .notify_connection(ConnectionNotice::Connected);
    }

    /// Catch up on joins and leaves whose events were dropped by a full
    /// channel.  The registry is authoritative.
    fn reconcile(&mut self) {
        let registry = Arc::clone(&self.registry);
        self.greeted.retain(|id| registry.contains(*id));

        let snapshot = registry.snapshot();
        let count = snapshot.len();
        if count < self.known_count {
            warn!(
                "ControlService: {} leave events missed, {} connected",
                self.known_count - count,
                count
            );
            self.controller.on_subscriber_disconnected(count);
        }
        self.known_count = count;

        for (id, _) in snapshot {
            if !self.greeted.contains(&id) {
                warn!("ControlService: join event for {} missed", id);
                self.greet(id, count);
            }
        }
    }

    // ── Observers ─────────────────────────────────────────────

    /// Mirror every emitted response into `sink` (local UI, logs).
    pub fn add_observer(&mut self, sink: impl ResponseSink + Send + 'static) {
        self.observers.push(Box::new(sink));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn session(&self) -> &SessionState {
        self.controller.session()
    }

    pub fn config(&self) -> &ControllerConfig {
        self.controller.config()
    }

    /// The last raw command received (health probes excluded).
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.count()
    }

    /// Shared handle for hosts that deliver liveness notices themselves.
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Stop playback and drop every subscriber without notifying them.
    pub fn shutdown(&mut self) {
        self.player.stop();
        let dropped = self.registry.clear();
        self.registry.drain_events(|_| {});
        self.greeted.clear();
        self.known_count = 0;
        info!("ControlService: shut down ({} subscribers dropped)", dropped);
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch(&mut self, cmd: &Command) {
        let mut fanout = Fanout {
            broadcaster: &self.broadcaster,
            observers: &mut self.observers,
        };
        self.controller
            .handle_command(cmd, &self.catalog, &mut self.player, &mut fanout);
    }

    fn emit(&mut self, response: &Response) {
        Fanout {
            broadcaster: &self.broadcaster,
            observers: &mut self.observers,
        }
        .emit(response);
    }
}
