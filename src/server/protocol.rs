//! JSON wire messages between clients and a match
//!
//! Client messages carry a `type` tag naming the command; field names are
//! camelCase to match the snapshot format.

use serde::{Deserialize, Serialize};

use crate::arena::lifecycle::JoinInfo;
use crate::arena::{Command, MatchSnapshot};
use crate::core::error::Result;
use crate::core::types::{OrbId, PlayerId, SpellId};
use crate::spells::{Bonus, Sigil};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    SetReady {
        ready: bool,
    },
    SelectSigil {
        sigil: Sigil,
    },
    #[serde(rename_all = "camelCase")]
    CollectOrb {
        orb_id: OrbId,
    },
    /// `elements` are forge-queue indices
    ForgeSpell {
        elements: Vec<i64>,
    },
    #[serde(rename_all = "camelCase")]
    CastSpell {
        spell_id: SpellId,
        x: f32,
        y: f32,
    },
    DispelPulse {
        x: f32,
        y: f32,
    },
    SelectBonus {
        bonus: Bonus,
    },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<ClientMessage> for Command {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::SetReady { ready } => Command::SetReady { ready },
            ClientMessage::SelectSigil { sigil } => Command::SelectSigil { sigil },
            ClientMessage::CollectOrb { orb_id } => Command::CollectOrb { orb_id },
            ClientMessage::ForgeSpell { elements } => Command::ForgeSpell { indices: elements },
            ClientMessage::CastSpell { spell_id, x, y } => Command::CastSpell { spell_id, x, y },
            ClientMessage::DispelPulse { x, y } => Command::DispelPulse { x, y },
            ClientMessage::SelectBonus { bonus } => Command::SelectBonus { bonus },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once to the joining connection only
    #[serde(rename_all = "camelCase")]
    Joined {
        room_code: String,
        player_id: PlayerId,
    },
    /// Full state, broadcast to every connection
    State { state: Box<MatchSnapshot> },
}

impl ServerMessage {
    pub fn joined(info: &JoinInfo) -> Self {
        ServerMessage::Joined {
            room_code: info.room_code.clone(),
            player_id: info.player_id,
        }
    }

    pub fn state(snapshot: MatchSnapshot) -> Self {
        ServerMessage::State {
            state: Box::new(snapshot),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
