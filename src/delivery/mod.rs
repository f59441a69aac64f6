//! Multi-subscriber delivery.
//!
//! ```text
//! ┌──────────────┐  register / unregister   ┌────────────────────┐
//! │  Service     │─────────────────────────▶│ SubscriberRegistry │◀── DeathRecipient
//! │              │                          │  (mutex + events)  │    (any thread)
//! │              │  broadcast(message)      └─────────┬──────────┘
//! │              │──────────▶ Broadcaster ── snapshot ┘
//! └──────────────┘            │  send to each, collect failures,
//!                             └─ evict failures after the pass
//! ```

pub mod broadcast;
pub mod registry;

pub use broadcast::{BroadcastReport, Broadcaster};
pub use registry::{EVENT_DEPTH, Registration, RegistryEvent, SubscriberRegistry};
