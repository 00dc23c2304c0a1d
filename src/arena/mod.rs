//! Arena - the authoritative simulation of one two-player match
//!
//! A match moves through lobby, sigil selection, countdown, combat, round
//! end and bonus selection until one player has won enough rounds.
//!
//! Key properties:
//! - One `Arena` per match, driven one event at a time
//! - All timers live on the arena's own clock and are cancelled on supersession
//! - Rejected commands change nothing and are never reported to clients

pub mod commands;
pub mod constants;
pub mod events;
pub mod instance;
pub mod lifecycle;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

// Re-exports for convenient access
pub use commands::{check_phase, Command, CommandKind, PHASE_GATES};
pub use events::{ArenaEvent, ArenaEventLog};
pub use instance::{generate_room_code, Arena, ArenaTimer};
pub use lifecycle::{JoinInfo, JoinOptions};
pub use schedule::{Scheduler, TimerHandle};
pub use snapshot::MatchSnapshot;
pub use state::{ElementOrb, MatchPhase, MatchState, Player, Seat, Zone};
pub use tick::{run_combat_tick, TickReport};
