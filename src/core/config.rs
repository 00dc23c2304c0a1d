//! Match configuration with documented tunables
//!
//! Every number the simulation uses lives here so a deployment can retune
//! pacing from a TOML file without touching code.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::arena::constants::*;
use crate::core::error::{Result, RiftError};

/// Configuration for one match instance
///
/// Defaults reproduce the standard ruleset. Any subset of fields may be given
/// in TOML; missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === CLOCK ===
    /// Period of the combat tick in milliseconds
    ///
    /// The simulation advances by exactly this delta each tick, so damage
    /// and regeneration are tick-rate independent only to float precision.
    pub tick_ms: u64,

    /// Width of a snapshot sampling bucket in milliseconds
    ///
    /// During combat at most one sampled snapshot is emitted per bucket.
    pub snapshot_ms: u64,

    /// Seconds counted down before each round
    pub countdown_seconds: u32,

    /// Length of a round before sudden death begins
    pub round_seconds: f32,

    /// Pause between a round ending and bonus selection opening
    pub round_end_delay_ms: u64,

    // === ARENA ===
    pub arena_width: f32,
    pub arena_height: f32,

    /// Orbs never spawn closer than this to the side walls
    pub orb_band_margin_x: f32,

    /// Orbs spawn within this distance of the midline
    pub orb_band_half_height: f32,

    // === ORBS ===
    /// Orbs placed when combat starts
    pub initial_orbs: usize,

    /// Spawning pauses while the pool holds this many orbs
    pub max_orbs: usize,

    /// Seconds between spawns at round start
    pub spawn_interval_start: f32,

    /// Interval reduction after each spawn
    pub spawn_interval_step: f32,

    /// Interval never drops below this
    pub spawn_interval_floor: f32,

    // === PLAYERS ===
    pub crystal_max: f32,
    pub rounds_to_win: u32,

    // === DISPEL ===
    pub dispel_radius: f32,
    pub dispel_cooldown: f32,

    // === ZONES ===
    /// Fraction of a zone's damage-per-second that reaches the crystal
    pub zone_damage_factor: f32,

    /// Shrink factor gained per second once the round timer is spent
    pub sudden_death_rate: f32,

    /// Delay before an echo sigil duplicate appears
    pub echo_delay_ms: u64,

    // === RANDOMNESS ===
    /// Fixed seed for a reproducible match; entropy when absent
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            snapshot_ms: SNAPSHOT_MS,
            countdown_seconds: COUNTDOWN_SECONDS,
            round_seconds: ROUND_SECONDS,
            round_end_delay_ms: ROUND_END_DELAY_MS,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            orb_band_margin_x: ORB_BAND_MARGIN_X,
            orb_band_half_height: ORB_BAND_HALF_HEIGHT,

            initial_orbs: INITIAL_ORBS,
            max_orbs: MAX_ORBS,
            spawn_interval_start: SPAWN_INTERVAL_START,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_floor: SPAWN_INTERVAL_FLOOR,

            crystal_max: CRYSTAL_MAX,
            rounds_to_win: ROUNDS_TO_WIN,

            dispel_radius: DISPEL_RADIUS,
            dispel_cooldown: DISPEL_COOLDOWN,

            zone_damage_factor: ZONE_DAMAGE_FACTOR,
            sudden_death_rate: SUDDEN_DEATH_RATE,
            echo_delay_ms: ECHO_DELAY_MS,

            seed: None,
        }
    }
}

impl MatchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a fixed RNG seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(contents)?;
        config.validate().map_err(RiftError::InvalidConfig)?;
        Ok(config)
    }

    pub fn tick_delta(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// y-coordinate separating the two halves of the arena
    pub fn midline(&self) -> f32 {
        self.arena_height / 2.0
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tick_ms == 0 {
            return Err("tick_ms must be positive".into());
        }

        if self.snapshot_ms < self.tick_ms {
            return Err(format!(
                "snapshot_ms ({}) should be >= tick_ms ({})",
                self.snapshot_ms, self.tick_ms
            ));
        }

        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err("Arena dimensions must be positive".into());
        }

        if self.orb_band_margin_x * 2.0 >= self.arena_width
            || self.orb_band_half_height * 2.0 >= self.arena_height
        {
            return Err("Orb band does not fit inside the arena".into());
        }

        if self.spawn_interval_floor <= 0.0 || self.spawn_interval_floor > self.spawn_interval_start
        {
            return Err(format!(
                "spawn_interval_floor ({}) should be in (0, spawn_interval_start ({})]",
                self.spawn_interval_floor, self.spawn_interval_start
            ));
        }

        if self.initial_orbs > self.max_orbs {
            return Err(format!(
                "initial_orbs ({}) should be <= max_orbs ({})",
                self.initial_orbs, self.max_orbs
            ));
        }

        if self.rounds_to_win == 0 {
            return Err("rounds_to_win must be at least 1".into());
        }

        if self.crystal_max <= 0.0 || self.round_seconds <= 0.0 {
            return Err("crystal_max and round_seconds must be positive".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<MatchConfig> = OnceLock::new();

/// Get the process-wide default match config (defaults if never set)
pub fn config() -> &'static MatchConfig {
    CONFIG.get_or_init(MatchConfig::default)
}

/// Set the process-wide default match config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: MatchConfig) -> std::result::Result<(), MatchConfig> {
    CONFIG.set(config)
}
