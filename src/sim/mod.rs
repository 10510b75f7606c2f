//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Simulation clock only (never the wall clock)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod archetype;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use archetype::{Archetype, ArchetypeSpec, EffectKind};
pub use collision::{CollisionEvent, circle_circle, circle_rect, detect};
pub use effects::{StatusEffects, TimedEffect};
pub use progression::{UPGRADE_CATALOG, UpgradeKind};
pub use spawn::SpawnPattern;
pub use state::{
    Avatar, Elite, ElitePhase, ExperienceOrb, GameEvent, GamePhase, GameState, Hostile,
    HostileShape, HostileTier, Particle, Pickup, PlayerUpgrades, Projectile,
};
pub use tick::{TickInput, tick};
