//! RiftSpells - authoritative simulation for two-player spell duels

pub mod arena;
pub mod core;
pub mod server;
pub mod spells;
