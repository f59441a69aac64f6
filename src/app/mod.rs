//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules of the controller: session
//! state, command interpretation and push-on-join.  All interaction with
//! the media library, the playback engine and subscribers happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real devices.

pub mod controller;
pub mod ports;
pub mod session;

pub use controller::Controller;
pub use ports::{CatalogPort, ConfigPort, PlaybackPort, ResponseSink, Track};
pub use session::SessionState;
