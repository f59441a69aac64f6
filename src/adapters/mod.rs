//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements    | Connects to                 |
//! |------------------|---------------|-----------------------------|
//! | `fs_catalog`     | CatalogPort   | Music folder on disk        |
//! | `memory_catalog` | CatalogPort   | Fixed in-memory table       |
//! | `sim_player`     | PlaybackPort  | Simulated engine (no audio) |
//! | `log_sink`       | ResponseSink  | `log` facade                |
//! | `json_config`    | ConfigPort    | JSON file                   |

pub mod fs_catalog;
pub mod json_config;
pub mod log_sink;
pub mod memory_catalog;
pub mod sim_player;

pub use fs_catalog::MusicFolderCatalog;
pub use json_config::JsonConfigFile;
pub use log_sink::LogResponseSink;
pub use memory_catalog::InMemoryCatalog;
pub use sim_player::SimulatedPlayer;
