//! Arena constants - default tunables for a match
//!
//! `MatchConfig::default()` is built from these; tests that need other values
//! override the config instead of the constants.

// Clock
pub const TICK_MS: u64 = 50;
pub const SNAPSHOT_MS: u64 = 200;
pub const COUNTDOWN_STEP_MS: u64 = 1000;
pub const COUNTDOWN_SECONDS: u32 = 3;
pub const ROUND_SECONDS: f32 = 180.0;
pub const ROUND_END_DELAY_MS: u64 = 2000;

// Arena geometry
pub const ARENA_WIDTH: f32 = 400.0;
pub const ARENA_HEIGHT: f32 = 600.0;
/// Horizontal margin kept free of orbs
pub const ORB_BAND_MARGIN_X: f32 = 40.0;
/// Half-height of the contested band around the midline
pub const ORB_BAND_HALF_HEIGHT: f32 = 100.0;

// Orbs
pub const INITIAL_ORBS: usize = 3;
pub const MAX_ORBS: usize = 5;
pub const SPAWN_INTERVAL_START: f32 = 3.0;
pub const SPAWN_INTERVAL_STEP: f32 = 0.1;
pub const SPAWN_INTERVAL_FLOOR: f32 = 1.5;

// Player
pub const CRYSTAL_MAX: f32 = 100.0;
pub const FORGE_QUEUE_CAP: usize = 3;
pub const SPELL_SLOT_CAP: usize = 4;
pub const ROUNDS_TO_WIN: u32 = 3;

// Dispel
pub const DISPEL_RADIUS: f32 = 60.0;
pub const DISPEL_COOLDOWN: f32 = 12.0;

// Zones
pub const ZONE_DAMAGE_FACTOR: f32 = 0.5;
pub const SUDDEN_DEATH_RATE: f32 = 0.1;

// Echo sigil
pub const ECHO_DELAY_MS: u64 = 1500;
pub const ECHO_RADIUS_FACTOR: f32 = 0.7;
pub const ECHO_DURATION_FACTOR: f32 = 0.5;
pub const ECHO_DAMAGE_FACTOR: f32 = 0.5;
