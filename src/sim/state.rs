//! Game state and core simulation types
//!
//! Everything the renderer needs (positions, shapes, colors, health
//! fractions, status flags) and everything determinism needs (RNG, entity
//! IDs, the simulation clock) lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, EffectKind};
use super::effects::StatusEffects;
use super::progression::UpgradeKind;
use super::spawn::SpawnPattern;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// No simulation running yet
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Loop paused for a one-time upgrade choice
    Upgrade,
    /// Run ended
    GameOver,
}

/// The player-controlled avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    pub radius: f32,
    /// Point the avatar steers toward
    pub target: Vec2,
    /// Current aim direction; `None` fires straight up
    pub aim: Option<Vec2>,
    /// Currently equipped projectile archetype
    pub archetype: Archetype,
}

impl Avatar {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: AVATAR_RADIUS,
            target: pos,
            aim: None,
            archetype: Archetype::Normal,
        }
    }

    pub fn move_to(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Steer toward the move target, clamped to the play area
    pub fn update(&mut self, dt: f32) {
        let delta = self.target - self.pos;
        if delta.length() > AVATAR_ARRIVE_DIST {
            self.pos += delta.normalize() * AVATAR_SPEED * dt;
        }
        self.pos.x = self.pos.x.clamp(self.radius, ARENA_WIDTH - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, ARENA_HEIGHT - self.radius);
    }

    /// Direction fired projectiles travel (screen y grows downward)
    pub fn fire_dir(&self) -> Vec2 {
        match self.aim {
            Some(aim) => aim.normalize_or(Vec2::NEG_Y),
            None => Vec2::NEG_Y,
        }
    }
}

/// A fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub archetype: Archetype,
    /// Hostiles struck so far (pierce bookkeeping)
    pub hits: u32,
    pub active: bool,
}

impl Projectile {
    pub fn effect(&self) -> EffectKind {
        self.archetype.spec().effect
    }

    pub fn color(&self) -> &'static str {
        self.archetype.spec().color
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        let r = self.radius;
        if self.pos.y < -r
            || self.pos.y > ARENA_HEIGHT + r
            || self.pos.x < -r
            || self.pos.x > ARENA_WIDTH + r
        {
            self.active = false;
        }
    }
}

/// Hostile difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileTier {
    Normal,
    Tank,
    Fast,
}

impl HostileTier {
    pub fn color(self) -> &'static str {
        match self {
            HostileTier::Normal => "#ff6b6b",
            HostileTier::Tank => "#845ec2",
            HostileTier::Fast => "#00d9ff",
        }
    }

    pub fn score(self) -> u64 {
        match self {
            HostileTier::Normal => 10,
            HostileTier::Tank => 25,
            HostileTier::Fast => 15,
        }
    }

    /// Experience carried by the orb this tier drops
    pub fn orb_value(self) -> u32 {
        match self {
            HostileTier::Normal => 5,
            HostileTier::Tank => 12,
            HostileTier::Fast => 8,
        }
    }
}

/// Collision footprint of a hostile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HostileShape {
    Circle { radius: f32 },
    /// Grid-variant hostiles occupy an axis-aligned rectangle
    Rect { w: f32, h: f32 },
}

impl HostileShape {
    /// Bounding rectangle (min, max corners) centered on `pos`
    pub fn bounds(&self, pos: Vec2) -> (Vec2, Vec2) {
        match *self {
            HostileShape::Circle { radius } => {
                (pos - Vec2::splat(radius), pos + Vec2::splat(radius))
            }
            HostileShape::Rect { w, h } => {
                let half = Vec2::new(w / 2.0, h / 2.0);
                (pos - half, pos + half)
            }
        }
    }

    /// y at which the shape has fully left through the bottom edge
    fn exit_y(&self) -> f32 {
        match *self {
            HostileShape::Circle { radius } => ARENA_HEIGHT + radius,
            HostileShape::Rect { h, .. } => ARENA_HEIGHT + h / 2.0,
        }
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub id: u32,
    pub pos: Vec2,
    pub shape: HostileShape,
    pub tier: HostileTier,
    pub hp: f32,
    pub max_hp: f32,
    /// Unslowed movement speed (units/sec)
    pub speed: f32,
    pub active: bool,
    pub effects: StatusEffects,
}

impl Hostile {
    pub fn color(&self) -> &'static str {
        self.tier.color()
    }

    pub fn health_fraction(&self) -> f32 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Advance status timers and movement. Returns burn damage owed this
    /// frame (applied by the combat pipeline so death payouts stay in one
    /// place) and whether the hostile escaped through the bottom edge.
    pub fn advance(&mut self, dt: f32, now_ms: f64) -> (f32, bool) {
        let burn_damage = self.effects.update(now_ms);
        self.pos.y += self.speed * self.effects.speed_multiplier() * dt;

        let leaked = self.pos.y > self.shape.exit_y();
        (burn_damage, leaked)
    }
}

/// Elite movement phase: descend into the arena, then patrol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElitePhase {
    Descend,
    Patrol { dir: f32 },
}

/// A rare high-health hostile spawned at fixed wave intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elite {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub phase: ElitePhase,
    pub active: bool,
}

impl Elite {
    pub const COLOR: &'static str = "#ff4757";

    pub fn health_fraction(&self) -> f32 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    pub fn update(&mut self, dt: f32) {
        match self.phase {
            ElitePhase::Descend => {
                self.pos.y += ELITE_DESCEND_SPEED * dt;
                if self.pos.y >= ELITE_PATROL_Y {
                    self.pos.y = ELITE_PATROL_Y;
                    self.phase = ElitePhase::Patrol { dir: 1.0 };
                }
            }
            ElitePhase::Patrol { dir } => {
                self.pos.x += dir * ELITE_PATROL_SPEED * dt;
                let min_x = self.radius;
                let max_x = ARENA_WIDTH - self.radius;
                if self.pos.x <= min_x {
                    self.pos.x = min_x;
                    self.phase = ElitePhase::Patrol { dir: 1.0 };
                } else if self.pos.x >= max_x {
                    self.pos.x = max_x;
                    self.phase = ElitePhase::Patrol { dir: -1.0 };
                }
            }
        }
    }
}

/// A falling heal/score pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl Pickup {
    pub const COLOR: &'static str = "#ffd700";

    pub fn update(&mut self, dt: f32) {
        self.pos.y += PICKUP_FALL_SPEED * dt;
        if self.pos.y > ARENA_HEIGHT + self.radius {
            self.active = false;
        }
    }
}

/// An experience orb, magnetized toward a nearby avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceOrb {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub value: u32,
    pub active: bool,
}

impl ExperienceOrb {
    pub const COLOR: &'static str = "#7bed9f";

    pub fn update(&mut self, dt: f32, avatar_pos: Option<Vec2>) {
        match avatar_pos {
            Some(target) if self.pos.distance(target) < ORB_MAGNET_RANGE => {
                let pull = (target - self.pos).normalize_or_zero();
                self.vel += pull * ORB_MAGNET_ACCEL * dt;
                self.vel = self.vel.clamp_length_max(ORB_MAX_SPEED);
            }
            _ => {
                self.vel = Vec2::new(0.0, ORB_FALL_SPEED);
            }
        }
        self.pos += self.vel * dt;
        if self.pos.y > ARENA_HEIGHT + self.radius {
            self.active = false;
        }
    }
}

/// A visual-only particle; carries no gameplay semantics
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: &'static str,
    /// Remaining life in seconds
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += 720.0 * dt;
        self.life -= dt;
    }
}

/// Persistent upgrade multipliers, mutated only through upgrade selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpgrades {
    pub damage: f32,
    pub projectile_speed: f32,
    pub fire_rate: f32,
    /// Additional hostiles a projectile may strike before deactivating
    pub pierce: u32,
    /// Additional projectiles per volley
    pub multishot: u32,
}

impl Default for PlayerUpgrades {
    fn default() -> Self {
        Self {
            damage: 1.0,
            projectile_speed: 1.0,
            fire_rate: 1.0,
            pierce: 0,
            multishot: 0,
        }
    }
}

/// Discrete happenings collaborators care about, drained each tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Entered the upgrade phase with these three choices
    UpgradeOffered { choices: [UpgradeKind; 3] },
    /// Lightning arced between two points (visual link)
    ChainArc { from: Vec2, to: Vec2 },
    /// Experience threshold crossed
    LevelUp { player_level: u32 },
    /// An elite entered the arena
    BossSpawned { level: u32 },
    /// Run ended
    GameOver { score: u64, level: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,

    /// Wave level (difficulty), starts at 1
    pub level: u32,
    /// Experience level, starts at 1
    pub player_level: u32,
    pub score: u64,
    pub hp: f32,
    pub max_hp: f32,
    pub experience: u32,
    pub exp_to_next: u32,
    pub kills: u64,
    pub wave_kills: u64,

    /// Simulation tick counter; advances only while `Playing`
    pub time_ticks: u64,
    pub wave_started_ms: f64,
    pub last_fire_ms: f64,
    pub last_spawn_ms: f64,

    pub avatar: Option<Avatar>,
    pub projectiles: Vec<Projectile>,
    pub hostiles: Vec<Hostile>,
    pub elites: Vec<Elite>,
    pub pickups: Vec<Pickup>,
    pub orbs: Vec<ExperienceOrb>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,

    pub upgrades: PlayerUpgrades,
    /// Choices on offer while in the `Upgrade` phase
    pub pending_upgrades: Option<[UpgradeKind; 3]>,
    pub spawn_pattern: SpawnPattern,
    pub tuning: Tuning,

    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            level: 1,
            player_level: 1,
            score: 0,
            hp: AVATAR_START_HP,
            max_hp: AVATAR_START_HP,
            experience: 0,
            exp_to_next: EXP_BASE,
            kills: 0,
            wave_kills: 0,
            time_ticks: 0,
            wave_started_ms: 0.0,
            // Negative anchors so the first volley and spawn land immediately
            last_fire_ms: -FIRE_INTERVAL_MS,
            last_spawn_ms: -SPAWN_INTERVAL_MS,
            avatar: None,
            projectiles: Vec::new(),
            hostiles: Vec::new(),
            elites: Vec::new(),
            pickups: Vec::new(),
            orbs: Vec::new(),
            particles: Vec::new(),
            upgrades: PlayerUpgrades::default(),
            pending_upgrades: None,
            spawn_pattern: SpawnPattern::default(),
            tuning: Tuning::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Simulation clock in milliseconds. Frozen outside `Playing` because
    /// the tick counter only advances there.
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * MS_PER_TICK
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn the avatar and enter `Playing`
    pub fn begin_run(&mut self) {
        self.avatar = Some(Avatar::new(Vec2::new(
            ARENA_WIDTH / 2.0,
            ARENA_HEIGHT - 80.0,
        )));
        self.wave_started_ms = self.now_ms();
        self.phase = GamePhase::Playing;
        log::info!("run started (seed {})", self.seed);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's events for the rendering/UI collaborator
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Avatar health for the HUD, 0..1
    pub fn health_fraction(&self) -> f32 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Experience progress toward the next level, 0..1
    pub fn experience_fraction(&self) -> f32 {
        if self.exp_to_next == 0 {
            0.0
        } else {
            (self.experience as f32 / self.exp_to_next as f32).min(1.0)
        }
    }

    /// Progress through the current wave, 0..1
    pub fn wave_fraction(&self) -> f32 {
        ((self.now_ms() - self.wave_started_ms) / WAVE_DURATION_MS).clamp(0.0, 1.0) as f32
    }

    pub fn hostile_index(&self, id: u32) -> Option<usize> {
        self.hostiles.iter().position(|h| h.id == id)
    }

    pub fn elite_index(&self, id: u32) -> Option<usize> {
        self.elites.iter().position(|e| e.id == id)
    }

    /// Drop entities whose active flag fell this frame. Runs once per tick,
    /// after all collision resolution, so a mid-frame deactivation stays
    /// visible to every remaining pairwise check.
    pub fn compact(&mut self) {
        self.projectiles.retain(|p| p.active);
        self.hostiles.retain(|h| h.active);
        self.elites.retain(|e| e.active);
        self.pickups.retain(|p| p.active);
        self.orbs.retain(|o| o.active);
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Spawn a ring of explosion particles at `pos`.
    ///
    /// Particle spread is hash-scrambled rather than drawn from `rng`, so
    /// cosmetics never perturb the gameplay RNG stream.
    pub fn spawn_explosion(&mut self, pos: Vec2, color: &'static str) {
        let count = 15u32;
        let seed = self.time_ticks as u32;
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let hash = seed.wrapping_mul(2654435761).wrapping_add(i * 7919);
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = 120.0 + (hash % 1000) as f32 / 1000.0 * 180.0;
            let size = 3.0 + ((hash >> 10) % 1000) as f32 / 1000.0 * 3.0;
            self.particles.push(Particle {
                pos,
                vel: crate::angle_to_dir(angle) * speed,
                color,
                life: 0.5,
                size,
            });
        }
    }

    /// Sparse particles along a lightning arc
    pub fn spawn_chain_trace(&mut self, from: Vec2, to: Vec2) {
        let segments = 5;
        for i in 0..=segments {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let t = i as f32 / segments as f32;
            self.particles.push(Particle {
                pos: from.lerp(to, t),
                vel: Vec2::ZERO,
                color: "#f7f740",
                life: 0.17,
                size: 3.0,
            });
        }
    }
}
