//! Spawn director
//!
//! Timer-driven introduction of hostiles at the top of the arena. The
//! interval shrinks as the wave level climbs (floored), and placement
//! follows the active spawn pattern. Elites are never spawned here — the
//! progression machine schedules those at fixed wave multiples.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::StatusEffects;
use super::state::{Elite, ElitePhase, GameState, Hostile, HostileShape, HostileTier};
use crate::consts::*;

/// Placement strategy for timer-driven spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPattern {
    /// One hostile at a random x
    #[default]
    Single,
    /// Column-aligned rectangular hostiles, placement-conflict checked
    Grid,
    /// 2-4 hostiles jittered around a shared anchor
    Cluster,
}

/// Spawn cadence for a wave level, floored so pressure stays survivable
pub fn spawn_interval_ms(level: u32) -> f64 {
    (SPAWN_INTERVAL_MS - level as f64 * SPAWN_INTERVAL_STEP_MS).max(SPAWN_INTERVAL_FLOOR_MS)
}

/// Roll a hostile tier: 60% normal, 25% tank, 15% fast
fn roll_tier(state: &mut GameState) -> HostileTier {
    let roll: f32 = state.rng.random();
    if roll < 0.6 {
        HostileTier::Normal
    } else if roll < 0.85 {
        HostileTier::Tank
    } else {
        HostileTier::Fast
    }
}

/// Tier stats scale with the wave level
fn make_hostile(state: &mut GameState, pos: Vec2, tier: HostileTier, shape: HostileShape) -> Hostile {
    let level = state.level;
    let (hp, speed) = match tier {
        HostileTier::Normal => ((2 + level) as f32, HOSTILE_SPEED),
        HostileTier::Tank => ((5 + 2 * level) as f32, HOSTILE_SPEED * 0.5),
        HostileTier::Fast => ((1 + level / 2) as f32, HOSTILE_SPEED * 2.0),
    };
    Hostile {
        id: state.next_entity_id(),
        pos,
        shape,
        tier,
        hp,
        max_hp: hp,
        speed,
        active: true,
        effects: StatusEffects::default(),
    }
}

fn tier_radius(tier: HostileTier) -> f32 {
    match tier {
        HostileTier::Normal => HOSTILE_RADIUS,
        HostileTier::Tank => HOSTILE_RADIUS * 1.2,
        HostileTier::Fast => HOSTILE_RADIUS * 0.8,
    }
}

/// Run the spawn timer; introduces hostiles when the interval has elapsed
pub fn run(state: &mut GameState) {
    let now = state.now_ms();
    if now - state.last_spawn_ms < spawn_interval_ms(state.level) {
        return;
    }
    // The interval is consumed whether or not placement succeeds
    state.last_spawn_ms = now;

    match state.spawn_pattern {
        SpawnPattern::Single => spawn_single(state),
        SpawnPattern::Grid => spawn_grid(state),
        SpawnPattern::Cluster => spawn_cluster(state),
    }
}

fn spawn_single(state: &mut GameState) {
    let tier = roll_tier(state);
    let radius = tier_radius(tier);
    let x = state.rng.random_range(radius..ARENA_WIDTH - radius);
    let hostile = make_hostile(
        state,
        Vec2::new(x, -radius),
        tier,
        HostileShape::Circle { radius },
    );
    state.hostiles.push(hostile);
}

/// `true` when two AABBs, padded by `spacing`, intersect
fn rects_overlap(min_a: Vec2, max_a: Vec2, min_b: Vec2, max_b: Vec2, spacing: f32) -> bool {
    min_a.x < max_b.x + spacing
        && max_a.x > min_b.x - spacing
        && min_a.y < max_b.y + spacing
        && max_a.y > min_b.y - spacing
}

/// Try candidate columns; reject any whose padded rectangle overlaps a live
/// hostile. All candidates rejected means this spawn is skipped.
fn spawn_grid(state: &mut GameState) {
    let columns = (ARENA_WIDTH / GRID_HOSTILE_W) as u32;
    let shape = HostileShape::Rect {
        w: GRID_HOSTILE_W,
        h: GRID_HOSTILE_H,
    };

    for _ in 0..GRID_SPAWN_ATTEMPTS {
        let col = state.rng.random_range(0..columns);
        let pos = Vec2::new(
            col as f32 * GRID_HOSTILE_W + GRID_HOSTILE_W / 2.0,
            -GRID_HOSTILE_H / 2.0,
        );
        let (min, max) = shape.bounds(pos);

        let blocked = state.hostiles.iter().filter(|h| h.active).any(|h| {
            let (h_min, h_max) = h.shape.bounds(h.pos);
            rects_overlap(min, max, h_min, h_max, GRID_SPACING)
        });
        if blocked {
            continue;
        }

        let tier = roll_tier(state);
        let hostile = make_hostile(state, pos, tier, shape);
        state.hostiles.push(hostile);
        return;
    }
    log::debug!("grid spawn skipped: all candidate columns blocked");
}

fn spawn_cluster(state: &mut GameState) {
    let count = state.rng.random_range(2..=4u32);
    let anchor_x = state
        .rng
        .random_range(HOSTILE_RADIUS * 4.0..ARENA_WIDTH - HOSTILE_RADIUS * 4.0);
    for _ in 0..count {
        let tier = roll_tier(state);
        let radius = tier_radius(tier);
        let dx = state.rng.random_range(-40.0..40.0);
        let dy = state.rng.random_range(-30.0..10.0);
        let pos = Vec2::new(
            (anchor_x + dx).clamp(radius, ARENA_WIDTH - radius),
            -radius + dy,
        );
        let hostile = make_hostile(state, pos, tier, HostileShape::Circle { radius });
        state.hostiles.push(hostile);
    }
}

/// Spawn one elite for the current wave level. Called by the progression
/// machine only.
pub fn spawn_elite(state: &mut GameState) {
    let hp = (40 + 15 * state.level) as f32;
    let x = state
        .rng
        .random_range(ELITE_RADIUS..ARENA_WIDTH - ELITE_RADIUS);
    let elite = Elite {
        id: state.next_entity_id(),
        pos: Vec2::new(x, -ELITE_RADIUS),
        radius: ELITE_RADIUS,
        hp,
        max_hp: hp,
        phase: ElitePhase::Descend,
        active: true,
    };
    log::info!("elite spawned at level {} with {} hp", state.level, hp);
    state.elites.push(elite);
}
