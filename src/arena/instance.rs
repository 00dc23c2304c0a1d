//! The per-match instance: state, clock, timers and RNG in one owner
//!
//! An `Arena` is a single-threaded actor. Commands and timer callbacks run
//! one at a time against its `MatchState`; nothing is shared between
//! arenas.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::arena::events::{ArenaEvent, ArenaEventLog};
use crate::arena::schedule::{Scheduler, TimerHandle};
use crate::arena::snapshot::MatchSnapshot;
use crate::arena::state::{MatchPhase, MatchState, Zone};
use crate::arena::tick::run_combat_tick;
use crate::core::config::MatchConfig;
use crate::core::error::{Result, RiftError};

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ROOM_CODE_LEN: usize = 6;

/// Six-character code without look-alike characters
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Callbacks the arena schedules on its own clock
#[derive(Debug, Clone)]
pub enum ArenaTimer {
    CountdownStep,
    CombatTick,
    OpenBonusSelect,
    EchoZone(Zone),
}

/// Handles of every armed timer, by purpose
#[derive(Debug, Default)]
pub(crate) struct TimerSlots {
    pub countdown: Option<TimerHandle>,
    pub combat_tick: Option<TimerHandle>,
    pub round_end: Option<TimerHandle>,
    pub echoes: Vec<TimerHandle>,
}

/// One running match
#[derive(Debug)]
pub struct Arena {
    pub(crate) state: MatchState,
    pub(crate) config: MatchConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) scheduler: Scheduler<ArenaTimer>,
    pub(crate) timers: TimerSlots,
    pub(crate) events: ArenaEventLog,
}

impl Arena {
    /// Fresh match in the lobby. Fails if `config` is inconsistent.
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate().map_err(RiftError::InvalidConfig)?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let room_code = generate_room_code(&mut rng);
        let state = MatchState::new(room_code, &config);

        Ok(Self {
            state,
            config,
            rng,
            scheduler: Scheduler::new(),
            timers: TimerSlots::default(),
            events: ArenaEventLog::new(),
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct state access for scenario setup and tooling
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn room_code(&self) -> &str {
        &self.state.room_code
    }

    /// Milliseconds on the arena clock
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Full-state view for clients
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.state)
    }

    /// Events recorded since the last call
    pub fn drain_events(&mut self) -> ArenaEventLog {
        self.events.take()
    }

    pub fn is_ticking(&self) -> bool {
        self.timers
            .combat_tick
            .as_ref()
            .is_some_and(|h| self.scheduler.is_active(h))
    }

    /// Timers currently armed (countdown, tick, delays, echoes)
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Run the clock forward, firing every due callback in order
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now_ms() + elapsed.as_millis() as u64;
        while let Some(timer) = self.scheduler.pop_due(until) {
            self.on_timer(timer);
        }
        self.scheduler.settle(until);
    }

    fn on_timer(&mut self, timer: ArenaTimer) {
        match timer {
            ArenaTimer::CountdownStep => self.countdown_step(),
            ArenaTimer::CombatTick => self.combat_tick(),
            ArenaTimer::OpenBonusSelect => self.open_bonus_select(),
            ArenaTimer::EchoZone(zone) => self.place_echo_zone(zone),
        }
    }

    fn combat_tick(&mut self) {
        if self.state.phase != MatchPhase::Combat {
            self.cancel_combat_tick();
            return;
        }

        let report = run_combat_tick(&mut self.state, &self.config, &mut self.rng);
        for orb_id in report.orbs_spawned {
            self.events.push(ArenaEvent::OrbSpawned { orb_id });
        }
        for zone_id in report.zones_expired {
            self.events.push(ArenaEvent::ZoneExpired { zone_id });
        }
        if report.snapshot_due {
            trace!(
                room = %self.state.room_code,
                round_timer = self.state.round_timer,
                "snapshot sample"
            );
            self.events.push(ArenaEvent::SnapshotSample);
        }
        if let Some(winner) = report.round_winner {
            self.end_round(winner);
        }
    }

    fn place_echo_zone(&mut self, zone: Zone) {
        self.timers
            .echoes
            .retain(|h| self.scheduler.is_active(h));
        if self.state.phase != MatchPhase::Combat {
            return;
        }
        self.events
            .push(ArenaEvent::EchoZoneCreated { zone_id: zone.id });
        self.state.zones.push(zone);
    }

    pub(crate) fn cancel_combat_tick(&mut self) {
        if let Some(handle) = self.timers.combat_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub(crate) fn cancel_countdown(&mut self) {
        if let Some(handle) = self.timers.countdown.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub(crate) fn cancel_round_end(&mut self) {
        if let Some(handle) = self.timers.round_end.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub(crate) fn cancel_echoes(&mut self) {
        for handle in self.timers.echoes.drain(..) {
            self.scheduler.cancel(handle);
        }
    }

    pub(crate) fn cancel_all_timers(&mut self) {
        self.cancel_countdown();
        self.cancel_combat_tick();
        self.cancel_round_end();
        self.cancel_echoes();
    }
}
