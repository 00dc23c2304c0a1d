pub mod config;
pub mod error;
pub mod types;

pub use config::MatchConfig;
pub use error::{Rejection, Result, RiftError};
pub use types::{OrbId, PlayerId, SpellId, Vec2, ZoneId};
