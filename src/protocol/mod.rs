//! Pipe-delimited text protocol.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Protocol Stack                         │
//! │                                                            │
//! │  ┌──────────┐   ┌───────────┐   ┌───────────────────────┐  │
//! │  │ raw &str │──▶│   wire    │──▶│  Command / Response   │  │
//! │  │          │   │ (tokens)  │   │  (typed variants)     │  │
//! │  └──────────┘   └───────────┘   └───────────────────────┘  │
//! │                                                            │
//! │  notice: CONNECTION:<status>  (registration channel)       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens are separated by `|` with no escaping: a `|` inside a genre or
//! title corrupts the message.  This is a known limitation of the format.

pub mod command;
pub mod notice;
pub mod response;
pub mod wire;

pub use command::Command;
pub use notice::{ConnectionNotice, Inbound};
pub use response::{PlayerState, Response};
