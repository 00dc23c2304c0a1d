//! Headless match runner
//!
//! Plays a full match between two scripted bots on the arena's virtual clock
//! and reports the outcome. Useful for tuning a config file and for checking
//! that a seed reproduces.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use riftspells::arena::{Arena, ArenaEvent, Command, JoinOptions, MatchPhase, Seat};
use riftspells::core::config::MatchConfig;
use riftspells::core::error::Result;
use riftspells::core::types::PlayerId;
use riftspells::spells::{Bonus, Sigil};

/// Headless RiftSpells match between two bots
#[derive(Parser, Debug)]
#[command(name = "riftspells")]
#[command(about = "Run a bot-vs-bot match and report the result")]
struct Args {
    /// Match config (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for a deterministic run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds of match time
    #[arg(long, default_value_t = 1800)]
    max_seconds: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Scripted player: grabs orbs, forges whatever it can, casts everything
/// at the enemy half and dispels zones landing on its own side.
struct Bot {
    player_id: PlayerId,
    seat: Seat,
    sigil: Sigil,
}

impl Bot {
    fn act(&self, arena: &mut Arena) {
        match arena.phase() {
            MatchPhase::SigilSelect => self.prepare(arena),
            MatchPhase::Combat => self.fight(arena),
            MatchPhase::BonusSelect => {
                let bonus = match arena.state().current_round % 2 {
                    0 => Bonus::QuickCast,
                    _ => Bonus::PowerSurge,
                };
                self.issue(arena, Command::SelectBonus { bonus });
            }
            _ => {}
        }
    }

    fn prepare(&self, arena: &mut Arena) {
        let ready = arena
            .state()
            .player(self.seat)
            .is_ok_and(|p| p.is_ready);
        if !ready {
            self.issue(arena, Command::SelectSigil { sigil: self.sigil });
            self.issue(arena, Command::SetReady { ready: true });
        }
    }

    fn fight(&self, arena: &mut Arena) {
        let midline = arena.config().midline();
        let Ok(me) = arena.state().player(self.seat) else {
            return;
        };

        let grab = (!me.queue_full())
            .then(|| arena.state().orbs.first().map(|o| o.id))
            .flatten();
        if let Some(orb_id) = grab {
            self.issue(arena, Command::CollectOrb { orb_id });
        }

        let Ok(me) = arena.state().player(self.seat) else {
            return;
        };
        let queued = me.forge_queue.len();
        let idle = me.spell_slots.iter().all(|s| !s.is_ready());
        if queued >= 2 {
            if !self.issue(arena, Command::ForgeSpell { indices: vec![0, 1] }) {
                self.issue(arena, Command::ForgeSpell { indices: vec![0] });
            }
        } else if queued == 1 && idle {
            self.issue(arena, Command::ForgeSpell { indices: vec![0] });
        }

        let target_y = match self.seat {
            Seat::One => midline * 0.5,
            Seat::Two => midline * 1.5,
        };
        let ready: Vec<_> = arena
            .state()
            .player(self.seat)
            .map(|p| {
                p.spell_slots
                    .iter()
                    .filter(|s| s.is_ready())
                    .map(|s| s.id)
                    .collect()
            })
            .unwrap_or_default();
        for spell_id in ready {
            let x = arena.config().arena_width / 2.0;
            self.issue(arena, Command::CastSpell { spell_id, x, y: target_y });
        }

        let threat = arena
            .state()
            .zones
            .iter()
            .find(|z| z.owner_id != self.player_id && self.seat.other().attacks(z.y, midline))
            .map(|z| (z.x, z.y));
        let dispel_ready = arena
            .state()
            .player(self.seat)
            .is_ok_and(|p| p.dispel_cooldown <= 0.0);
        if let (Some((x, y)), true) = (threat, dispel_ready) {
            self.issue(arena, Command::DispelPulse { x, y });
        }
    }

    fn issue(&self, arena: &mut Arena, command: Command) -> bool {
        arena.handle_command(self.player_id, command).is_ok()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("riftspells=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    info!(seed, "starting headless match");

    let tick = config.tick_period();
    let limit_ms = args.max_seconds.saturating_mul(1000);
    let mut arena = Arena::new(config)?;

    let mut bots = Vec::with_capacity(2);
    for (name, sigil) in [("Ashwind", Sigil::Echo), ("Quillfrost", Sigil::Greed)] {
        let info = arena.join(JoinOptions {
            username: Some(name.to_string()),
            sigil: None,
        })?;
        bots.push(Bot {
            player_id: info.player_id,
            seat: info.seat,
            sigil,
        });
    }

    while arena.phase() != MatchPhase::MatchEnd && arena.now_ms() < limit_ms {
        for bot in &bots {
            bot.act(&mut arena);
        }
        arena.advance(tick);

        for event in arena.drain_events().events {
            if let ArenaEvent::RoundWon { round, winner } = event {
                let state = arena.state();
                let name = state
                    .seat_of(winner)
                    .and_then(|seat| state.player(seat).ok())
                    .map(|p| p.username.as_str())
                    .unwrap_or("?");
                info!(round, winner = name, at_ms = arena.now_ms(), "round decided");
            }
        }
    }

    let snapshot = arena.snapshot();
    match snapshot.winner_id {
        Some(winner) => {
            let state = arena.state();
            let name = state
                .seat_of(winner)
                .and_then(|seat| state.player(seat).ok())
                .map(|p| p.username.clone())
                .unwrap_or_default();
            info!(
                winner = %name,
                rounds = snapshot.current_round,
                elapsed_s = arena.now_ms() / 1000,
                "match finished"
            );
        }
        None => warn!(limit_s = args.max_seconds, phase = ?arena.phase(), "match hit the time limit"),
    }

    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        for player in [&snapshot.player1, &snapshot.player2].into_iter().flatten() {
            println!(
                "{:<12} rounds won: {}  crystal: {:.1}  spells: {}",
                player.username,
                player.rounds_won,
                player.crystal_health,
                player.spell_slots.len()
            );
        }
    }
    Ok(())
}
