//! Combat tick - one fixed step of the round simulation
//!
//! Each tick: round timer -> orb spawning -> spell cooldowns -> dispel
//! cooldowns -> zones -> win check. Only runs while the match is in combat.

use rand::Rng;

use crate::arena::state::{MatchState, Seat};
use crate::core::config::MatchConfig;
use crate::core::types::{OrbId, ZoneId};

/// Slack for the summed f32 tick deltas, far below one tick
const SPAWN_TOLERANCE: f32 = 1e-4;

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub orbs_spawned: Vec<OrbId>,
    pub zones_expired: Vec<ZoneId>,
    /// Seat whose opponent's crystal broke this tick
    pub round_winner: Option<Seat>,
    /// A snapshot sampling bucket boundary was crossed
    pub snapshot_due: bool,
}

/// Advance combat by one tick of `config.tick_delta()` seconds
pub fn run_combat_tick<R: Rng + ?Sized>(
    state: &mut MatchState,
    config: &MatchConfig,
    rng: &mut R,
) -> TickReport {
    let dt = config.tick_delta();
    let mut report = TickReport::default();

    step_round_timer(state, config, dt);
    step_orb_spawning(state, config, rng, dt, &mut report);
    step_spell_cooldowns(state, dt);
    step_dispel_cooldowns(state, dt);
    step_zones(state, config, dt, &mut report);
    report.round_winner = check_round_winner(state);

    let before = state.combat_elapsed_ms / config.snapshot_ms;
    state.combat_elapsed_ms += config.tick_ms;
    report.snapshot_due = state.combat_elapsed_ms / config.snapshot_ms != before;

    report
}

/// Count the round down; once spent, sudden death ramps toward 1
fn step_round_timer(state: &mut MatchState, config: &MatchConfig, dt: f32) {
    state.round_timer = (state.round_timer - dt).max(0.0);
    if state.round_timer <= 0.0 {
        state.sudden_death_shrink =
            (state.sudden_death_shrink + config.sudden_death_rate * dt).min(1.0);
    }
}

fn step_orb_spawning<R: Rng + ?Sized>(
    state: &mut MatchState,
    config: &MatchConfig,
    rng: &mut R,
    dt: f32,
    report: &mut TickReport,
) {
    state.spawn_timer += dt;
    if state.spawn_timer + SPAWN_TOLERANCE < state.spawn_interval
        || state.orbs.len() >= config.max_orbs
    {
        return;
    }

    report.orbs_spawned.push(state.spawn_orb(config, rng));
    state.spawn_timer = 0.0;
    state.spawn_interval =
        (state.spawn_interval - config.spawn_interval_step).max(config.spawn_interval_floor);
}

fn step_spell_cooldowns(state: &mut MatchState, dt: f32) {
    for player in state.seated_mut() {
        for spell in player.spell_slots.iter_mut() {
            spell.regenerate(dt);
        }
    }
}

fn step_dispel_cooldowns(state: &mut MatchState, dt: f32) {
    for player in state.seated_mut() {
        if player.dispel_cooldown > 0.0 {
            player.dispel_cooldown = (player.dispel_cooldown - dt).max(0.0);
        }
    }
}

/// Age zones and let the survivors burn the enemy crystal
fn step_zones(state: &mut MatchState, config: &MatchConfig, dt: f32, report: &mut TickReport) {
    let midline = config.midline();
    let mut damage = [0.0_f32; 2];

    state.zones.retain_mut(|zone| {
        zone.remaining_duration -= dt;
        if zone.remaining_duration <= 0.0 {
            report.zones_expired.push(zone.id);
            return false;
        }
        true
    });

    for zone in &state.zones {
        let Some(owner) = state.seat_of(zone.owner_id) else {
            continue;
        };
        if owner.attacks(zone.y, midline) {
            damage[owner.other().index()] +=
                zone.damage_per_second * dt * config.zone_damage_factor;
        }
    }

    for seat in Seat::BOTH {
        if damage[seat.index()] > 0.0 {
            if let Ok(player) = state.player_mut(seat) {
                player.damage_crystal(damage[seat.index()]);
            }
        }
    }
}

/// Seat that won the round, if a crystal is broken
pub fn check_round_winner(state: &MatchState) -> Option<Seat> {
    for seat in Seat::BOTH {
        if state.player(seat).is_ok_and(|p| p.is_defeated()) {
            return Some(seat.other());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::state::{Player, Zone};
    use crate::core::types::{PlayerId, Vec2};
    use crate::spells::{forge_spell, Element};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn combat_state(config: &MatchConfig) -> MatchState {
        let mut state = MatchState::new("TEST01".into(), config);
        state.players[0] = Some(Player::new(PlayerId::new(), "one".into(), 100.0));
        state.players[1] = Some(Player::new(PlayerId::new(), "two".into(), 100.0));
        state.phase = crate::arena::MatchPhase::Combat;
        state
    }

    fn zone_for(state: &MatchState, seat: Seat, y: f32, dps: f32) -> Zone {
        let mut spell = forge_spell(&[Element::Fire]).unwrap();
        spell.damage_per_second = dps;
        spell.duration = 10.0;
        Zone::from_cast(&spell, state.player(seat).unwrap().id, Vec2::new(200.0, y))
    }

    #[test]
    fn test_round_timer_and_sudden_death() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        state.round_timer = 0.05;

        run_combat_tick(&mut state, &config, &mut rng);
        assert_eq!(state.round_timer, 0.0);
        assert!(state.sudden_death_shrink > 0.0);

        state.sudden_death_shrink = 0.999;
        run_combat_tick(&mut state, &config, &mut rng);
        assert_eq!(state.sudden_death_shrink, 1.0);
    }

    #[test]
    fn test_no_shrink_while_timer_runs() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            run_combat_tick(&mut state, &config, &mut rng);
        }
        assert_eq!(state.sudden_death_shrink, 0.0);
        assert!(state.round_timer < 180.0);
    }

    #[test]
    fn test_orb_spawn_accelerates_and_caps() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut spawned = 0;
        for _ in 0..2000 {
            spawned += run_combat_tick(&mut state, &config, &mut rng).orbs_spawned.len();
        }
        assert_eq!(spawned, config.max_orbs);
        assert_eq!(state.orbs.len(), config.max_orbs);
        assert!((state.spawn_interval - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_first_spawn_lands_on_the_interval() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut spawn_ticks = Vec::new();
        for tick in 1..=120 {
            if !run_combat_tick(&mut state, &config, &mut rng).orbs_spawned.is_empty() {
                spawn_ticks.push(tick);
            }
        }
        // 3.0s then 2.9s at 20 Hz
        assert_eq!(spawn_ticks, vec![60, 118]);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        state.spawn_interval = 1.55;
        state.spawn_timer = 10.0;
        run_combat_tick(&mut state, &config, &mut rng);
        assert_eq!(state.spawn_interval, config.spawn_interval_floor);
    }

    #[test]
    fn test_zone_in_enemy_half_damages_enemy() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let zone = zone_for(&state, Seat::One, 100.0, 10.0);
        state.zones.push(zone);

        run_combat_tick(&mut state, &config, &mut rng);
        let two = state.player(Seat::Two).unwrap();
        assert!((two.crystal_health - (100.0 - 10.0 * 0.05 * 0.5)).abs() < 1e-4);
        assert_eq!(state.player(Seat::One).unwrap().crystal_health, 100.0);
    }

    #[test]
    fn test_zone_in_own_half_is_harmless() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let zone = zone_for(&state, Seat::Two, 100.0, 10.0);
        state.zones.push(zone);

        run_combat_tick(&mut state, &config, &mut rng);
        for seat in Seat::BOTH {
            assert_eq!(state.player(seat).unwrap().crystal_health, 100.0);
        }
    }

    #[test]
    fn test_zone_expires() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut zone = zone_for(&state, Seat::One, 100.0, 10.0);
        zone.remaining_duration = 0.04;
        let id = zone.id;
        state.zones.push(zone);

        let report = run_combat_tick(&mut state, &config, &mut rng);
        assert_eq!(report.zones_expired, vec![id]);
        assert!(state.zones.is_empty());
        assert_eq!(state.player(Seat::Two).unwrap().crystal_health, 100.0);
    }

    #[test]
    fn test_broken_crystal_reports_winner() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        state.player_mut(Seat::Two).unwrap().crystal_health = 0.001;
        let zone = zone_for(&state, Seat::One, 50.0, 100.0);
        state.zones.push(zone);

        let report = run_combat_tick(&mut state, &config, &mut rng);
        assert_eq!(report.round_winner, Some(Seat::One));
    }

    #[test]
    fn test_dispel_cooldown_clamps() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        state.player_mut(Seat::One).unwrap().dispel_cooldown = 0.01;
        run_combat_tick(&mut state, &config, &mut rng);
        assert_eq!(state.player(Seat::One).unwrap().dispel_cooldown, 0.0);
    }

    #[test]
    fn test_snapshot_sampled_every_fourth_tick() {
        let config = MatchConfig::default();
        let mut state = combat_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let due: Vec<bool> = (0..8)
            .map(|_| run_combat_tick(&mut state, &config, &mut rng).snapshot_due)
            .collect();
        assert_eq!(due, vec![false, false, false, true, false, false, false, true]);
    }
}
