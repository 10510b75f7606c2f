//! Ball Breaker - a roguelite arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, combat, progression)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Persistent score leaderboard
//!
//! Rendering, input capture, and UI live outside this crate. They consume the
//! renderable state `sim` exposes each tick and feed movement/aim/fire intent
//! back through `sim::TickInput`.

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the reference cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Simulation-clock milliseconds per tick
    pub const MS_PER_TICK: f64 = 1000.0 / 60.0;

    /// Play area dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Avatar defaults
    pub const AVATAR_RADIUS: f32 = 20.0;
    pub const AVATAR_SPEED: f32 = 300.0;
    pub const AVATAR_START_HP: f32 = 100.0;
    /// Avatar stops steering once within this distance of its move target
    pub const AVATAR_ARRIVE_DIST: f32 = 2.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 8.0;
    /// Base auto-fire cadence, divided by the fire-rate multiplier
    pub const FIRE_INTERVAL_MS: f64 = 800.0;
    /// Angular spread between multishot projectiles (radians)
    pub const MULTISHOT_SPREAD: f32 = std::f32::consts::PI / 8.0;

    /// Hostile defaults
    pub const HOSTILE_RADIUS: f32 = 15.0;
    pub const HOSTILE_SPEED: f32 = 60.0;
    /// Grid-variant hostile bounding rectangle
    pub const GRID_HOSTILE_W: f32 = 40.0;
    pub const GRID_HOSTILE_H: f32 = 30.0;
    /// Candidate columns tried before a grid spawn is skipped
    pub const GRID_SPAWN_ATTEMPTS: u32 = 8;
    /// Clearance kept between grid hostiles when placing
    pub const GRID_SPACING: f32 = 6.0;

    /// Spawn pressure curve: interval shrinks with level down to the floor
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 500.0;

    /// Wave length
    pub const WAVE_DURATION_MS: f64 = 30_000.0;

    /// Status effect timings
    pub const BURN_DURATION_MS: f64 = 3000.0;
    pub const BURN_GRACE_MS: f64 = 500.0;
    pub const BURN_TICK_MS: f64 = 500.0;
    pub const BURN_TICK_DAMAGE: f32 = 0.5;
    pub const SLOW_DURATION_MS: f64 = 2000.0;
    pub const SLOW_FACTOR: f32 = 0.5;

    /// Elemental effect reach
    pub const CHAIN_RANGE: f32 = 100.0;
    pub const CHAIN_MAX_TARGETS: usize = 3;
    pub const SPLASH_RADIUS: f32 = 50.0;

    /// Contact damage to the avatar
    pub const CONTACT_DAMAGE: f32 = 10.0;
    /// Penalty when a hostile escapes through the bottom edge
    pub const LEAK_DAMAGE: f32 = 20.0;

    /// Pickup defaults
    pub const PICKUP_RADIUS: f32 = 12.0;
    pub const PICKUP_FALL_SPEED: f32 = 120.0;
    pub const PICKUP_HEAL: f32 = 10.0;
    pub const PICKUP_SCORE: u64 = 50;

    /// Experience orb defaults
    pub const ORB_RADIUS: f32 = 6.0;
    pub const ORB_FALL_SPEED: f32 = 60.0;
    pub const ORB_MAGNET_RANGE: f32 = 80.0;
    pub const ORB_MAGNET_ACCEL: f32 = 600.0;
    pub const ORB_MAX_SPEED: f32 = 360.0;

    /// Leveling curve
    pub const EXP_BASE: u32 = 10;
    pub const EXP_GROWTH: f32 = 1.5;
    pub const LEVEL_HEAL: f32 = 10.0;

    /// Elite (boss) defaults
    pub const ELITE_RADIUS: f32 = 40.0;
    pub const ELITE_DESCEND_SPEED: f32 = 45.0;
    pub const ELITE_PATROL_SPEED: f32 = 90.0;
    /// Elites descend to this y, then patrol horizontally
    pub const ELITE_PATROL_Y: f32 = 120.0;
    pub const ELITE_SCORE: u64 = 200;

    /// Visual particle cap
    pub const MAX_PARTICLES: usize = 256;
}

/// Squared distance between two points
#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Unit vector for an angle (0 = +x, counterclockwise)
#[inline]
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
