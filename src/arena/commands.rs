//! Player commands and their handlers
//!
//! Every handler first resolves the sender's seat, then checks the phase
//! gate table, then validates the command. Any failure leaves the state
//! untouched and is reported as a `Rejection` that never reaches the client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::instance::{Arena, ArenaTimer};
use crate::arena::state::{MatchPhase, Player, Seat, Zone};
use crate::core::error::{CommandResult, Rejection};
use crate::core::types::{OrbId, PlayerId, SpellId, Vec2};
use crate::spells::{forge_spell, Bonus, Element, Sigil};

/// Intent sent by a player
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetReady { ready: bool },
    SelectSigil { sigil: Sigil },
    CollectOrb { orb_id: OrbId },
    /// Forge-queue indices, as sent by the client
    ForgeSpell { indices: Vec<i64> },
    CastSpell { spell_id: SpellId, x: f32, y: f32 },
    DispelPulse { x: f32, y: f32 },
    SelectBonus { bonus: Bonus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    SetReady,
    SelectSigil,
    CollectOrb,
    ForgeSpell,
    CastSpell,
    DispelPulse,
    SelectBonus,
}

/// Phases in which each command is accepted
pub const PHASE_GATES: [(CommandKind, &[MatchPhase]); 7] = [
    (CommandKind::SetReady, &[MatchPhase::SigilSelect]),
    (CommandKind::SelectSigil, &[MatchPhase::SigilSelect]),
    (CommandKind::CollectOrb, &[MatchPhase::Combat]),
    (CommandKind::ForgeSpell, &[MatchPhase::Combat]),
    (CommandKind::CastSpell, &[MatchPhase::Combat]),
    (CommandKind::DispelPulse, &[MatchPhase::Combat]),
    (CommandKind::SelectBonus, &[MatchPhase::BonusSelect]),
];

impl CommandKind {
    pub fn allowed_phases(&self) -> &'static [MatchPhase] {
        PHASE_GATES
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, phases)| *phases)
            .unwrap_or(&[])
    }
}

/// Gate a command kind on the current phase
pub fn check_phase(kind: CommandKind, phase: MatchPhase) -> CommandResult {
    if kind.allowed_phases().contains(&phase) {
        Ok(())
    } else {
        Err(Rejection::WrongPhase(phase))
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::SetReady { .. } => CommandKind::SetReady,
            Command::SelectSigil { .. } => CommandKind::SelectSigil,
            Command::CollectOrb { .. } => CommandKind::CollectOrb,
            Command::ForgeSpell { .. } => CommandKind::ForgeSpell,
            Command::CastSpell { .. } => CommandKind::CastSpell,
            Command::DispelPulse { .. } => CommandKind::DispelPulse,
            Command::SelectBonus { .. } => CommandKind::SelectBonus,
        }
    }
}

fn seated(players: &mut [Option<Player>; 2], seat: Seat) -> Result<&mut Player, Rejection> {
    players[seat.index()].as_mut().ok_or(Rejection::NotJoined)
}

impl Arena {
    /// Apply a player's command. Rejected commands change nothing.
    pub fn handle_command(&mut self, player_id: PlayerId, command: Command) -> CommandResult {
        let kind = command.kind();
        let result = self.dispatch(player_id, command);
        match &result {
            Ok(()) => debug!(room = %self.state.room_code, player = %player_id, ?kind, "command applied"),
            Err(reason) => debug!(
                room = %self.state.room_code,
                player = %player_id,
                ?kind,
                %reason,
                "command ignored"
            ),
        }
        result
    }

    fn dispatch(&mut self, player_id: PlayerId, command: Command) -> CommandResult {
        let seat = self.state.seat_of(player_id).ok_or(Rejection::NotJoined)?;
        check_phase(command.kind(), self.state.phase)?;

        match command {
            Command::SetReady { ready } => self.set_ready(seat, ready),
            Command::SelectSigil { sigil } => {
                seated(&mut self.state.players, seat)?.selected_sigil = Some(sigil);
                Ok(())
            }
            Command::CollectOrb { orb_id } => self.collect_orb(seat, orb_id),
            Command::ForgeSpell { indices } => self.forge(seat, &indices),
            Command::CastSpell { spell_id, x, y } => self.cast(seat, spell_id, Vec2::new(x, y)),
            Command::DispelPulse { x, y } => self.dispel(seat, Vec2::new(x, y)),
            Command::SelectBonus { bonus } => self.select_bonus(seat, bonus),
        }
    }

    fn set_ready(&mut self, seat: Seat, ready: bool) -> CommandResult {
        seated(&mut self.state.players, seat)?.is_ready = ready;
        if self.state.all_ready() {
            self.start_countdown();
        }
        Ok(())
    }

    fn collect_orb(&mut self, seat: Seat, orb_id: OrbId) -> CommandResult {
        if seated(&mut self.state.players, seat)?.queue_full() {
            return Err(Rejection::Capacity("forge queue"));
        }
        let element = self
            .state
            .take_orb(orb_id)
            .ok_or_else(|| Rejection::UnknownEntity(format!("orb {orb_id}")))?;
        seated(&mut self.state.players, seat)?.forge_queue.push(element);
        Ok(())
    }

    fn forge(&mut self, seat: Seat, indices: &[i64]) -> CommandResult {
        let player = seated(&mut self.state.players, seat)?;
        if indices.is_empty() || indices.len() > 2 {
            return Err(Rejection::InvalidCombination);
        }

        let mut picked: Vec<usize> = Vec::with_capacity(indices.len());
        for &raw in indices {
            let idx = usize::try_from(raw)
                .ok()
                .filter(|&i| i < player.forge_queue.len() && !picked.contains(&i))
                .ok_or_else(|| Rejection::UnknownEntity(format!("forge queue index {raw}")))?;
            picked.push(idx);
        }

        let elements: Vec<Element> = picked.iter().map(|&i| player.forge_queue[i]).collect();
        let mut spell = forge_spell(&elements).ok_or(Rejection::InvalidCombination)?;
        if let Some(sigil) = player.selected_sigil {
            sigil.apply_on_forge(&mut spell);
        }
        player.insert_spell(spell);

        // Highest index first so the remaining indices stay valid
        picked.sort_unstable_by(|a, b| b.cmp(a));
        for idx in picked {
            player.forge_queue.remove(idx);
        }
        Ok(())
    }

    fn cast(&mut self, seat: Seat, spell_id: SpellId, at: Vec2) -> CommandResult {
        let player = seated(&mut self.state.players, seat)?;
        let owner_id = player.id;
        let echo = player.selected_sigil == Some(Sigil::Echo);

        let spell = player
            .spell_mut(spell_id)
            .ok_or_else(|| Rejection::UnknownEntity(format!("spell {spell_id}")))?;
        if spell.current_charges == 0 {
            return Err(Rejection::Insufficient("no charges"));
        }
        if spell.current_cooldown > 0.0 {
            return Err(Rejection::Insufficient("spell on cooldown"));
        }

        let zone = Zone::from_cast(spell, owner_id, at);
        spell.consume_charge();

        if echo {
            let handle = self
                .scheduler
                .schedule_once(self.config.echo_delay_ms, ArenaTimer::EchoZone(zone.echo()));
            self.timers.echoes.push(handle);
        }
        self.state.zones.push(zone);
        Ok(())
    }

    fn dispel(&mut self, seat: Seat, at: Vec2) -> CommandResult {
        let radius = self.config.dispel_radius;
        let player = seated(&mut self.state.players, seat)?;
        if player.dispel_cooldown > 0.0 {
            return Err(Rejection::Insufficient("dispel on cooldown"));
        }
        player.dispel_cooldown = self.config.dispel_cooldown;

        self.state
            .zones
            .retain(|zone| zone.position().distance(&at) >= radius + zone.radius);
        Ok(())
    }

    fn select_bonus(&mut self, seat: Seat, bonus: Bonus) -> CommandResult {
        let player = seated(&mut self.state.players, seat)?;
        if player.selected_bonus.is_some() {
            return Err(Rejection::Capacity("bonus already chosen"));
        }
        player.selected_bonus = Some(bonus);
        bonus.apply(&mut player.spell_slots, &mut self.rng);

        if self.state.all_bonuses_chosen() {
            self.start_next_round();
        }
        Ok(())
    }
}
