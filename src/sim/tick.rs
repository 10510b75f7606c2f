//! Fixed timestep simulation tick
//!
//! Per-frame ordering: read intent → advance clock → fire → spawn →
//! advance entities → detect collisions → resolve combat → compact →
//! check transitions. The `Upgrade` phase handles only the choice input,
//! so every timer (burn, slow, fire, spawn, wave) freezes while a choice
//! is pending.

use glam::Vec2;

use super::state::{GamePhase, GameState, Projectile};
use super::{collision, combat, progression, spawn};
use crate::angle_to_dir;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Point the avatar should steer toward
    pub move_to: Option<Vec2>,
    /// Aim direction for fired projectiles; `None` fires straight up
    pub aim: Option<Vec2>,
    /// Fire intent. The input collaborator keeps this set for auto-fire;
    /// the cadence timer still gates actual volleys.
    pub fire: bool,
    /// Begin a run from the start screen
    pub start: bool,
    /// Upgrade choice index while the loop is paused
    pub choose: Option<usize>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Start => {
            if input.start {
                state.begin_run();
            }
        }
        GamePhase::Upgrade => {
            if let Some(index) = input.choose {
                progression::choose_upgrade(state, index);
            }
        }
        GamePhase::GameOver => {}
        GamePhase::Playing => playing_tick(state, input, dt),
    }
}

fn playing_tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    let now = state.now_ms();

    // Read this tick's intent
    if let Some(avatar) = &mut state.avatar {
        if let Some(target) = input.move_to {
            avatar.move_to(target);
        }
        avatar.aim = input.aim;
    }

    if input.fire {
        try_fire(state, now);
    }

    spawn::run(state);

    // Advance entities: status timers first, then movement
    if let Some(avatar) = &mut state.avatar {
        avatar.update(dt);
    }
    for p in &mut state.projectiles {
        p.update(dt);
    }

    let mut burn_damage: Vec<(u32, f32)> = Vec::new();
    let mut leaked = 0u32;
    for h in &mut state.hostiles {
        if !h.active {
            continue;
        }
        let (burn, escaped) = h.advance(dt, now);
        if escaped {
            h.active = false;
            leaked += 1;
        } else if burn > 0.0 {
            burn_damage.push((h.id, burn));
        }
    }
    // Burn kills pay out through the same path as projectile kills
    for (id, amount) in burn_damage {
        combat::damage_hostile_id(state, id, amount);
    }
    if leaked > 0 {
        state.hp -= LEAK_DAMAGE * leaked as f32;
        log::debug!("{leaked} hostile(s) leaked through the bottom edge");
    }

    for e in &mut state.elites {
        e.update(dt);
    }
    let avatar_pos = state.avatar.as_ref().map(|a| a.pos);
    for p in &mut state.pickups {
        p.update(dt);
    }
    for o in &mut state.orbs {
        o.update(dt, avatar_pos);
    }
    for particle in &mut state.particles {
        particle.update(dt);
    }

    // Detect, then resolve: every pair is checked against this frame's
    // consistent entity set before anything is removed
    let events = collision::detect(state);
    combat::resolve(state, &events);
    state.compact();

    progression::update(state);
}

/// Fire a volley if the cadence timer has elapsed
fn try_fire(state: &mut GameState, now: f64) {
    let Some(avatar) = &state.avatar else {
        return;
    };
    let interval = FIRE_INTERVAL_MS / state.upgrades.fire_rate as f64;
    if now - state.last_fire_ms < interval {
        return;
    }
    let (pos, dir, archetype) = (avatar.pos, avatar.fire_dir(), avatar.archetype);
    state.last_fire_ms = now;

    let spec = archetype.spec();
    let speed = spec.speed * state.upgrades.projectile_speed;
    let base_angle = dir.y.atan2(dir.x);
    let count = 1 + state.upgrades.multishot;
    let origin = pos + dir * AVATAR_RADIUS;

    for i in 0..count {
        let offset = (i as f32 - (count - 1) as f32 / 2.0) * MULTISHOT_SPREAD;
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos: origin,
            vel: angle_to_dir(base_angle + offset) * speed,
            radius: PROJECTILE_RADIUS,
            archetype,
            hits: 0,
            active: true,
        });
    }
}
