//! Match lifecycle - joins, phase transitions, rounds and match end
//!
//! lobby -> sigilSelect -> countdown -> combat -> roundEnd
//!   -> bonusSelect -> countdown -> ... -> matchEnd
//!
//! Every transition that supersedes a schedule cancels the old timer before
//! arming a new one, so a stale callback can never act on a later phase.

use tracing::{info, warn};

use crate::arena::constants::COUNTDOWN_STEP_MS;
use crate::arena::events::ArenaEvent;
use crate::arena::instance::{Arena, ArenaTimer};
use crate::arena::state::{MatchPhase, Player, Seat};
use crate::core::error::{Result, RiftError};
use crate::core::types::PlayerId;
use crate::spells::Sigil;

/// What a connecting client asks for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinOptions {
    pub username: Option<String>,
    pub sigil: Option<Sigil>,
}

/// What a connecting client is told
#[derive(Debug, Clone, PartialEq)]
pub struct JoinInfo {
    pub room_code: String,
    pub player_id: PlayerId,
    pub seat: Seat,
}

impl Arena {
    /// Seat a new player. The second join opens sigil selection.
    pub fn join(&mut self, options: JoinOptions) -> Result<JoinInfo> {
        if self.state.phase != MatchPhase::Lobby {
            return Err(RiftError::RoomFull);
        }
        let seat = self.state.first_free_seat().ok_or(RiftError::RoomFull)?;

        let player_id = PlayerId::new();
        let username = options
            .username
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Player {}", seat.index() + 1));

        let mut player = Player::new(player_id, username, self.config.crystal_max);
        player.selected_sigil = options.sigil;
        info!(
            room = %self.state.room_code,
            player = %player_id,
            username = %player.username,
            ?seat,
            "player joined"
        );
        self.state.players[seat.index()] = Some(player);
        self.events.push(ArenaEvent::PlayerJoined { player_id, seat });

        if self.state.is_full() {
            self.set_phase(MatchPhase::SigilSelect);
        }

        Ok(JoinInfo {
            room_code: self.state.room_code.clone(),
            player_id,
            seat,
        })
    }

    /// A player disconnected
    ///
    /// In the lobby the seat is freed. Once the match has started the other
    /// player wins outright.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<()> {
        let seat = self
            .state
            .seat_of(player_id)
            .ok_or(RiftError::PlayerNotFound(player_id))?;
        self.events.push(ArenaEvent::PlayerLeft { player_id });

        match self.state.phase {
            MatchPhase::Lobby => {
                info!(room = %self.state.room_code, player = %player_id, "player left lobby");
                self.state.players[seat.index()] = None;
            }
            MatchPhase::MatchEnd => {}
            phase => {
                warn!(
                    room = %self.state.room_code,
                    player = %player_id,
                    ?phase,
                    "player disconnected mid-match"
                );
                let winner = self.state.player(seat.other())?.id;
                self.end_match(winner);
            }
        }
        Ok(())
    }

    pub(crate) fn set_phase(&mut self, to: MatchPhase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        info!(room = %self.state.room_code, ?from, ?to, "phase changed");
        self.events.push(ArenaEvent::PhaseChanged { from, to });
    }

    /// Reset the countdown and start stepping it once per second
    pub(crate) fn start_countdown(&mut self) {
        self.cancel_countdown();
        self.state.countdown_timer = self.config.countdown_seconds;
        self.set_phase(MatchPhase::Countdown);

        if self.config.countdown_seconds == 0 {
            self.start_combat();
            return;
        }
        let handle = self
            .scheduler
            .schedule_every(COUNTDOWN_STEP_MS, ArenaTimer::CountdownStep);
        self.timers.countdown = Some(handle);
    }

    pub(crate) fn countdown_step(&mut self) {
        if self.state.phase != MatchPhase::Countdown {
            self.cancel_countdown();
            return;
        }

        self.state.countdown_timer = self.state.countdown_timer.saturating_sub(1);
        self.events.push(ArenaEvent::CountdownTick {
            remaining: self.state.countdown_timer,
        });
        if self.state.countdown_timer == 0 {
            self.cancel_countdown();
            self.start_combat();
        }
    }

    /// Fresh round clock, fresh orbs, tick loop armed
    fn start_combat(&mut self) {
        self.cancel_combat_tick();

        let state = &mut self.state;
        state.round_timer = self.config.round_seconds;
        state.sudden_death_shrink = 0.0;
        state.spawn_timer = 0.0;
        state.combat_elapsed_ms = 0;
        state.orbs.clear();
        for _ in 0..self.config.initial_orbs {
            state.spawn_orb(&self.config, &mut self.rng);
        }

        self.set_phase(MatchPhase::Combat);
        let handle = self
            .scheduler
            .schedule_every(self.config.tick_ms, ArenaTimer::CombatTick);
        self.timers.combat_tick = Some(handle);
    }

    /// Credit `winner` with the round and decide what comes next
    pub(crate) fn end_round(&mut self, winner: Seat) {
        self.cancel_combat_tick();
        self.cancel_echoes();

        let round = self.state.current_round;
        let (winner_id, rounds_won) = match self.state.player_mut(winner) {
            Ok(player) => {
                player.rounds_won += 1;
                (player.id, player.rounds_won)
            }
            Err(err) => {
                warn!(room = %self.state.room_code, %err, "round ended without a winner seat");
                return;
            }
        };

        info!(
            room = %self.state.room_code,
            round,
            winner = %winner_id,
            rounds_won,
            "round won"
        );
        self.events.push(ArenaEvent::RoundWon {
            round,
            winner: winner_id,
        });
        self.set_phase(MatchPhase::RoundEnd);

        if rounds_won >= self.config.rounds_to_win {
            self.end_match(winner_id);
        } else {
            self.cancel_round_end();
            let handle = self.scheduler.schedule_once(
                self.config.round_end_delay_ms,
                ArenaTimer::OpenBonusSelect,
            );
            self.timers.round_end = Some(handle);
        }
    }

    pub(crate) fn open_bonus_select(&mut self) {
        self.timers.round_end = None;
        if self.state.phase != MatchPhase::RoundEnd {
            return;
        }
        for player in self.state.seated_mut() {
            player.selected_bonus = None;
        }
        self.set_phase(MatchPhase::BonusSelect);
    }

    /// Both bonuses are in: reset the board and count down the next round
    pub(crate) fn start_next_round(&mut self) {
        let crystal_max = self.config.crystal_max;
        let state = &mut self.state;
        state.current_round += 1;
        for player in state.seated_mut() {
            player.reset_for_round(crystal_max);
        }
        state.zones.clear();
        state.orbs.clear();
        state.spawn_interval = self.config.spawn_interval_start;
        state.spawn_timer = 0.0;
        state.sudden_death_shrink = 0.0;
        state.round_timer = self.config.round_seconds;

        info!(room = %self.state.room_code, round = self.state.current_round, "next round");
        self.start_countdown();
    }

    pub(crate) fn end_match(&mut self, winner: PlayerId) {
        self.cancel_all_timers();
        self.state.winner_id = Some(winner);
        info!(room = %self.state.room_code, winner = %winner, "match won");
        self.events.push(ArenaEvent::MatchWon { winner });
        self.set_phase(MatchPhase::MatchEnd);
    }
}
