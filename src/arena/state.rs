//! Match state - the data model a single match owns
//!
//! Everything clients see is derived from here. Other arena modules mutate
//! it; nothing outside the owning `Arena` holds a reference across calls.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::constants::{
    ECHO_DAMAGE_FACTOR, ECHO_DURATION_FACTOR, ECHO_RADIUS_FACTOR, FORGE_QUEUE_CAP, SPELL_SLOT_CAP,
};
use crate::core::config::MatchConfig;
use crate::core::error::{Result, RiftError};
use crate::core::types::{OrbId, PlayerId, SpellId, Vec2, ZoneId};
use crate::spells::{Bonus, Element, Sigil, Spell};

/// Match phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPhase {
    #[default]
    Lobby, // Waiting for the second player
    SigilSelect,
    Countdown,
    Combat,
    RoundEnd,
    BonusSelect,
    MatchEnd, // Terminal
}

/// One of the two player seats, in join order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// First joiner; defends the bottom half
    One,
    /// Second joiner; defends the top half
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn index(&self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn other(&self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Whether `y` lies in the half this seat attacks
    pub fn attacks(&self, y: f32, midline: f32) -> bool {
        match self {
            Seat::One => y < midline,
            Seat::Two => y > midline,
        }
    }
}

/// An element pickup lying in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementOrb {
    pub id: OrbId,
    pub element: Element,
    pub x: f32,
    pub y: f32,
}

/// An active spell effect on the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,
    pub spell_id: SpellId,
    pub owner_id: PlayerId,
    pub primary_element: Element,
    pub secondary_element: Option<Element>,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub remaining_duration: f32,
    pub damage_per_second: f32,
}

impl Zone {
    /// Zone a cast of `spell` places at `at`
    pub fn from_cast(spell: &Spell, owner_id: PlayerId, at: Vec2) -> Self {
        Self {
            id: ZoneId::new(),
            spell_id: spell.id,
            owner_id,
            primary_element: spell.elements.first().copied().unwrap_or(Element::Fire),
            secondary_element: spell.elements.get(1).copied(),
            x: at.x,
            y: at.y,
            radius: spell.radius,
            remaining_duration: spell.duration,
            damage_per_second: spell.damage_per_second,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Weaker copy the echo sigil leaves behind
    pub fn echo(&self) -> Self {
        Self {
            id: ZoneId::new(),
            radius: self.radius * ECHO_RADIUS_FACTOR,
            remaining_duration: self.remaining_duration * ECHO_DURATION_FACTOR,
            damage_per_second: self.damage_per_second * ECHO_DAMAGE_FACTOR,
            ..self.clone()
        }
    }
}

/// A seated player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub selected_sigil: Option<Sigil>,
    /// Collected elements waiting to be forged (oldest first)
    pub forge_queue: Vec<Element>,
    /// Forged spells (oldest first)
    pub spell_slots: Vec<Spell>,
    pub crystal_health: f32,
    pub dispel_cooldown: f32,
    pub rounds_won: u32,
    pub is_ready: bool,
    pub selected_bonus: Option<Bonus>,
}

impl Player {
    pub fn new(id: PlayerId, username: String, crystal_max: f32) -> Self {
        Self {
            id,
            username,
            selected_sigil: None,
            forge_queue: Vec::new(),
            spell_slots: Vec::new(),
            crystal_health: crystal_max,
            dispel_cooldown: 0.0,
            rounds_won: 0,
            is_ready: false,
            selected_bonus: None,
        }
    }

    pub fn queue_full(&self) -> bool {
        self.forge_queue.len() >= FORGE_QUEUE_CAP
    }

    /// Add a spell, evicting the oldest when all slots are taken
    pub fn insert_spell(&mut self, spell: Spell) -> Option<Spell> {
        let evicted = if self.spell_slots.len() >= SPELL_SLOT_CAP {
            Some(self.spell_slots.remove(0))
        } else {
            None
        };
        self.spell_slots.push(spell);
        evicted
    }

    pub fn spell_mut(&mut self, spell_id: SpellId) -> Option<&mut Spell> {
        self.spell_slots.iter_mut().find(|s| s.id == spell_id)
    }

    /// Subtract crystal health, never below zero
    pub fn damage_crystal(&mut self, amount: f32) {
        self.crystal_health = (self.crystal_health - amount).max(0.0);
    }

    pub fn is_defeated(&self) -> bool {
        self.crystal_health <= 0.0
    }

    /// Per-round reset; spells and sigil carry over
    pub fn reset_for_round(&mut self, crystal_max: f32) {
        self.crystal_health = crystal_max;
        self.forge_queue.clear();
        self.dispel_cooldown = 0.0;
    }
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct MatchState {
    pub room_code: String,
    pub phase: MatchPhase,
    pub players: [Option<Player>; 2],
    pub orbs: Vec<ElementOrb>,
    pub zones: Vec<Zone>,
    pub current_round: u32,
    /// Seconds left in the round (0 once sudden death starts)
    pub round_timer: f32,
    /// Whole seconds left in the pre-round countdown
    pub countdown_timer: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    /// Sudden-death pressure, 0..=1
    pub sudden_death_shrink: f32,
    pub winner_id: Option<PlayerId>,

    // Spawn pacing (not mirrored to clients)
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    /// Combat time elapsed this round, for snapshot sampling
    pub combat_elapsed_ms: u64,
}

impl MatchState {
    pub fn new(room_code: String, config: &MatchConfig) -> Self {
        Self {
            room_code,
            phase: MatchPhase::Lobby,
            players: [None, None],
            orbs: Vec::new(),
            zones: Vec::new(),
            current_round: 1,
            round_timer: config.round_seconds,
            countdown_timer: config.countdown_seconds,
            arena_width: config.arena_width,
            arena_height: config.arena_height,
            sudden_death_shrink: 0.0,
            winner_id: None,
            spawn_timer: 0.0,
            spawn_interval: config.spawn_interval_start,
            combat_elapsed_ms: 0,
        }
    }

    pub fn player(&self, seat: Seat) -> Result<&Player> {
        self.players[seat.index()]
            .as_ref()
            .ok_or(RiftError::SeatEmpty(seat))
    }

    pub fn player_mut(&mut self, seat: Seat) -> Result<&mut Player> {
        self.players[seat.index()]
            .as_mut()
            .ok_or(RiftError::SeatEmpty(seat))
    }

    /// Seat held by `id`, if any
    pub fn seat_of(&self, id: PlayerId) -> Option<Seat> {
        Seat::BOTH.into_iter().find(|seat| {
            self.players[seat.index()]
                .as_ref()
                .is_some_and(|p| p.id == id)
        })
    }

    pub fn first_free_seat(&self) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|seat| self.players[seat.index()].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.players.iter().all(Option::is_some)
    }

    /// Seated players (both seats once the match has started)
    pub fn seated(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().flatten()
    }

    pub fn seated_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut().flatten()
    }

    pub fn all_ready(&self) -> bool {
        self.is_full() && self.seated().all(|p| p.is_ready)
    }

    pub fn all_bonuses_chosen(&self) -> bool {
        self.is_full() && self.seated().all(|p| p.selected_bonus.is_some())
    }

    /// Drop a new orb at a random point in the contested band
    pub fn spawn_orb<R: Rng + ?Sized>(&mut self, config: &MatchConfig, rng: &mut R) -> OrbId {
        let midline = config.midline();
        let x = rng.gen_range(config.orb_band_margin_x..=config.arena_width - config.orb_band_margin_x);
        let y = rng.gen_range(
            midline - config.orb_band_half_height..=midline + config.orb_band_half_height,
        );
        let element = Element::ALL[rng.gen_range(0..Element::ALL.len())];

        let orb = ElementOrb {
            id: OrbId::new(),
            element,
            x,
            y,
        };
        let id = orb.id;
        self.orbs.push(orb);
        id
    }

    /// Remove an orb from the pool, returning its element
    pub fn take_orb(&mut self, orb_id: OrbId) -> Option<Element> {
        let idx = self.orbs.iter().position(|o| o.id == orb_id)?;
        Some(self.orbs.remove(idx).element)
    }
}
