//! Full-state snapshot sent to clients
//!
//! Snapshots are whole-state and owned, so they can be handed to any number
//! of connections after the arena has moved on.

use serde::{Deserialize, Serialize};

use crate::arena::state::{ElementOrb, MatchPhase, MatchState, Player, Zone};
use crate::core::error::Result;
use crate::core::types::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub room_code: String,
    pub phase: MatchPhase,
    pub player1: Option<Player>,
    pub player2: Option<Player>,
    pub orbs: Vec<ElementOrb>,
    pub zones: Vec<Zone>,
    pub current_round: u32,
    pub round_timer: f32,
    pub countdown_timer: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub sudden_death_shrink: f32,
    pub winner_id: Option<PlayerId>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        let [player1, player2] = state.players.clone();
        Self {
            room_code: state.room_code.clone(),
            phase: state.phase,
            player1,
            player2,
            orbs: state.orbs.clone(),
            zones: state.zones.clone(),
            current_round: state.current_round,
            round_timer: state.round_timer,
            countdown_timer: state.countdown_timer,
            arena_width: state.arena_width,
            arena_height: state.arena_height,
            sudden_death_shrink: state.sudden_death_shrink,
            winner_id: state.winner_id,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
