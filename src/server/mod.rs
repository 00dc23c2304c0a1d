//! Server surface - wire messages and the per-match tokio actor
//!
//! Transports (websocket, tests, bots) parse client JSON into commands and
//! forward them through a `MatchHandle`. State goes back out as full
//! snapshots on a broadcast channel.

pub mod actor;
pub mod protocol;

pub use actor::{spawn_match, MatchHandle};
pub use protocol::{ClientMessage, ServerMessage};
