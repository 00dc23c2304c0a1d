//! Events the arena records as it runs
//!
//! The owner drains them after each command or clock advance to decide
//! whether clients need a fresh snapshot and to log what happened.

use serde::{Deserialize, Serialize};

use crate::arena::state::{MatchPhase, Seat};
use crate::core::types::{OrbId, PlayerId, ZoneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    PlayerJoined { player_id: PlayerId, seat: Seat },
    PlayerLeft { player_id: PlayerId },
    PhaseChanged { from: MatchPhase, to: MatchPhase },
    CountdownTick { remaining: u32 },
    OrbSpawned { orb_id: OrbId },
    ZoneExpired { zone_id: ZoneId },
    EchoZoneCreated { zone_id: ZoneId },
    RoundWon { round: u32, winner: PlayerId },
    MatchWon { winner: PlayerId },
    /// Combat crossed a snapshot sampling boundary
    SnapshotSample,
}

impl ArenaEvent {
    /// Whether clients must get a snapshot because of this event
    ///
    /// Spawns and expiries inside combat ride on the sampled snapshots.
    pub fn requests_broadcast(&self) -> bool {
        !matches!(
            self,
            ArenaEvent::OrbSpawned { .. } | ArenaEvent::ZoneExpired { .. }
        )
    }
}

/// Events accumulated since the last drain
#[derive(Debug, Clone, Default)]
pub struct ArenaEventLog {
    pub events: Vec<ArenaEvent>,
}

impl ArenaEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ArenaEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn requests_broadcast(&self) -> bool {
        self.events.iter().any(ArenaEvent::requests_broadcast)
    }

    pub fn take(&mut self) -> ArenaEventLog {
        std::mem::take(self)
    }
}
