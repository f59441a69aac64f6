//! PlayCtl: media transport control library.
//!
//! Remote peers send pipe-delimited command strings to a single stateful
//! controller; the controller broadcasts typed responses to every
//! registered subscriber.
//!
//! ```text
//!  raw command ──▶ protocol::Command ──▶ app::Controller ──▶ protocol::Response
//!                                              │                    │
//!                              CatalogPort · PlaybackPort           ▼
//!                                                        delivery::Broadcaster
//!                                                                   │
//!                                         SubscriberRegistry ◀──────┘ (evict on failure)
//! ```
//!
//! The core never touches an OS service framework: hosts hand it raw
//! strings and [`transport::Transport`] implementations.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod client;
pub mod config;
pub mod delivery;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;

pub use error::{Error, Result};
