//! Combat resolution pipeline
//!
//! Consumes the collision events produced by the detect pass and performs
//! every gameplay mutation: damage, elemental side-effects, pierce
//! bookkeeping, death payouts, contact damage, and collection. Every
//! operation is guarded on the target's active flag so an entity
//! deactivated earlier in the same frame is never paid out twice.

use glam::Vec2;
use rand::Rng;

use super::archetype::EffectKind;
use super::collision::CollisionEvent;
use super::state::{ExperienceOrb, GameEvent, GameState, Pickup};
use crate::consts::*;

/// Resolve all of this frame's collision events, in detection order
pub fn resolve(state: &mut GameState, events: &[CollisionEvent]) {
    for &event in events {
        match event {
            CollisionEvent::ProjectileHostile { projectile, hostile } => {
                projectile_hit(state, projectile, Target::Hostile(hostile));
            }
            CollisionEvent::ProjectileElite { projectile, elite } => {
                projectile_hit(state, projectile, Target::Elite(elite));
            }
            CollisionEvent::AvatarHostile { hostile } => {
                avatar_contact(state, Target::Hostile(hostile));
            }
            CollisionEvent::AvatarElite { elite } => {
                avatar_contact(state, Target::Elite(elite));
            }
            CollisionEvent::AvatarPickup { pickup } => {
                collect_pickup(state, pickup);
            }
            CollisionEvent::AvatarOrb { orb } => {
                collect_orb(state, orb);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Hostile(u32),
    Elite(u32),
}

fn target_pos(state: &GameState, target: Target) -> Option<Vec2> {
    match target {
        Target::Hostile(id) => state
            .hostiles
            .iter()
            .find(|h| h.id == id && h.active)
            .map(|h| h.pos),
        Target::Elite(id) => state
            .elites
            .iter()
            .find(|e| e.id == id && e.active)
            .map(|e| e.pos),
    }
}

fn projectile_hit(state: &mut GameState, projectile_id: u32, target: Target) {
    // The projectile may have exhausted its pierce budget on an earlier
    // event this frame
    let Some(p_idx) = state
        .projectiles
        .iter()
        .position(|p| p.id == projectile_id && p.active)
    else {
        return;
    };
    let Some(impact) = target_pos(state, target) else {
        return;
    };

    let spec = state.projectiles[p_idx].archetype.spec();
    let damage = spec.damage * state.upgrades.damage;
    let now = state.now_ms();

    match target {
        Target::Hostile(id) => {
            damage_hostile_id(state, id, damage);
        }
        Target::Elite(id) => {
            damage_elite_id(state, id, damage);
        }
    }

    // Elemental side-effects fire on every hit, not just the first
    match spec.effect {
        EffectKind::None => {}
        EffectKind::Burn => {
            if let Target::Hostile(id) = target
                && let Some(idx) = state.hostile_index(id)
                && state.hostiles[idx].active
            {
                state.hostiles[idx].effects.apply_burn(now);
            }
        }
        EffectKind::Slow => {
            if let Target::Hostile(id) = target
                && let Some(idx) = state.hostile_index(id)
                && state.hostiles[idx].active
            {
                state.hostiles[idx].effects.apply_slow(now);
            }
        }
        EffectKind::Chain => {
            let source = match target {
                Target::Hostile(id) => Some(id),
                Target::Elite(_) => None,
            };
            chain_lightning(state, impact, source);
        }
        EffectKind::Splash => {
            splash(state, impact, damage);
        }
    }

    // Pierce bookkeeping: budget 0 dies on the first hit
    let p = &mut state.projectiles[p_idx];
    p.hits += 1;
    if p.hits > state.upgrades.pierce {
        p.active = false;
    }
}

/// Arc to the nearest active hostiles around the struck target.
///
/// Targets are ordered nearest-first (entity ID breaks ties) so the choice
/// is deterministic, never the source, and capped at [`CHAIN_MAX_TARGETS`].
fn chain_lightning(state: &mut GameState, source_pos: Vec2, source_id: Option<u32>) {
    let mut candidates: Vec<(f32, u32, Vec2)> = state
        .hostiles
        .iter()
        .filter(|h| h.active && Some(h.id) != source_id)
        .map(|h| (h.pos.distance(source_pos), h.id, h.pos))
        .filter(|(dist, _, _)| *dist < CHAIN_RANGE)
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    candidates.truncate(CHAIN_MAX_TARGETS);

    let arc_damage = state.upgrades.damage;
    for (_, id, pos) in candidates {
        state.push_event(GameEvent::ChainArc {
            from: source_pos,
            to: pos,
        });
        state.spawn_chain_trace(source_pos, pos);
        damage_hostile_id(state, id, arc_damage);
    }
}

/// Radial damage with linear falloff: full at the center, zero at the rim.
///
/// The struck hostile itself is splashed too while it is still active
/// (distance zero, full damage); if the direct hit already killed it the
/// active guard skips it.
fn splash(state: &mut GameState, center: Vec2, damage: f32) {
    let victims: Vec<(u32, f32)> = state
        .hostiles
        .iter()
        .filter(|h| h.active)
        .map(|h| (h.id, h.pos.distance(center)))
        .filter(|(_, dist)| *dist < SPLASH_RADIUS)
        .map(|(id, dist)| (id, damage * (1.0 - dist / SPLASH_RADIUS)))
        .collect();
    for (id, amount) in victims {
        damage_hostile_id(state, id, amount);
    }
}

/// Damage a hostile, paying out its death exactly once. Returns `true` if
/// it died from this application.
pub fn damage_hostile_id(state: &mut GameState, id: u32, amount: f32) -> bool {
    let Some(idx) = state.hostile_index(id) else {
        return false;
    };
    let h = &mut state.hostiles[idx];
    if !h.active {
        return false;
    }
    h.hp = (h.hp - amount).max(0.0);
    if h.hp > 0.0 {
        return false;
    }
    h.active = false;
    let pos = h.pos;
    let tier = h.tier;

    state.score += tier.score();
    state.kills += 1;
    state.wave_kills += 1;
    state.spawn_explosion(pos, tier.color());

    let value = tier.orb_value();
    push_orb(state, pos, value);
    roll_pickup_drop(state, pos);
    true
}

/// Damage an elite, paying out its death exactly once
pub fn damage_elite_id(state: &mut GameState, id: u32, amount: f32) -> bool {
    let Some(idx) = state.elite_index(id) else {
        return false;
    };
    let e = &mut state.elites[idx];
    if !e.active {
        return false;
    }
    e.hp = (e.hp - amount).max(0.0);
    if e.hp > 0.0 {
        return false;
    }
    e.active = false;
    let pos = e.pos;

    state.score += ELITE_SCORE;
    state.kills += 1;
    state.wave_kills += 1;
    state.spawn_explosion(pos, super::state::Elite::COLOR);
    log::info!("elite defeated at level {}", state.level);

    // Elites scatter a burst of high-value orbs
    let burst = state.tuning.elite_orb_burst;
    for i in 0..burst {
        let angle = std::f32::consts::TAU * i as f32 / burst.max(1) as f32;
        let offset = crate::angle_to_dir(angle) * ELITE_RADIUS * 0.5;
        push_orb(state, pos + offset, 10);
    }
    roll_pickup_drop(state, pos);
    true
}

fn push_orb(state: &mut GameState, pos: Vec2, value: u32) {
    let id = state.next_entity_id();
    state.orbs.push(ExperienceOrb {
        id,
        pos,
        vel: Vec2::ZERO,
        radius: ORB_RADIUS,
        value,
        active: true,
    });
}

fn roll_pickup_drop(state: &mut GameState, pos: Vec2) {
    let roll: f32 = state.rng.random();
    if roll < state.tuning.pickup_drop_chance {
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            pos,
            radius: PICKUP_RADIUS,
            active: true,
        });
    }
}

/// Contact damage: the avatar is hurt, the hostile does not survive
fn avatar_contact(state: &mut GameState, target: Target) {
    if state.avatar.is_none() {
        return;
    }
    let pos = match target {
        Target::Hostile(id) => {
            let Some(idx) = state.hostile_index(id) else {
                return;
            };
            let h = &mut state.hostiles[idx];
            if !h.active {
                return;
            }
            h.active = false;
            h.pos
        }
        Target::Elite(id) => {
            let Some(idx) = state.elite_index(id) else {
                return;
            };
            let e = &mut state.elites[idx];
            if !e.active {
                return;
            }
            e.active = false;
            e.pos
        }
    };
    state.hp -= CONTACT_DAMAGE;
    state.spawn_explosion(pos, "#ff6b6b");
}

fn collect_pickup(state: &mut GameState, id: u32) {
    let Some(pickup) = state.pickups.iter_mut().find(|p| p.id == id && p.active) else {
        return;
    };
    pickup.active = false;
    let pos = pickup.pos;
    state.hp = (state.hp + PICKUP_HEAL).min(state.max_hp);
    state.score += PICKUP_SCORE;
    state.spawn_explosion(pos, Pickup::COLOR);
}

fn collect_orb(state: &mut GameState, id: u32) {
    let Some(orb) = state.orbs.iter_mut().find(|o| o.id == id && o.active) else {
        return;
    };
    orb.active = false;
    state.experience += orb.value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetype::Archetype;
    use crate::sim::effects::StatusEffects;
    use crate::sim::state::{Elite, ElitePhase, Hostile, HostileShape, HostileTier, Projectile};

    fn hostile_at(state: &mut GameState, pos: Vec2, hp: f32) -> u32 {
        let id = state.next_entity_id();
        state.hostiles.push(Hostile {
            id,
            pos,
            shape: HostileShape::Circle {
                radius: HOSTILE_RADIUS,
            },
            tier: HostileTier::Normal,
            hp,
            max_hp: hp,
            speed: HOSTILE_SPEED,
            active: true,
            effects: StatusEffects::default(),
        });
        id
    }

    fn projectile_at(state: &mut GameState, pos: Vec2, archetype: Archetype) -> u32 {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: Vec2::new(0.0, -360.0),
            radius: PROJECTILE_RADIUS,
            archetype,
            hits: 0,
            active: true,
        });
        id
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(42);
        state.begin_run();
        state
    }

    // ── pierce ───────────────────────────────────────────────────────────

    #[test]
    fn test_zero_pierce_deactivates_on_first_hit() {
        let mut state = playing_state();
        let h = hostile_at(&mut state, Vec2::new(100.0, 100.0), 3.0);
        let p = projectile_at(&mut state, Vec2::new(100.0, 100.0), Archetype::Normal);

        resolve(
            &mut state,
            &[CollisionEvent::ProjectileHostile {
                projectile: p,
                hostile: h,
            }],
        );
        assert!(!state.projectiles[0].active);
        assert_eq!(state.hostiles[0].hp, 2.0);
        assert!(state.hostiles[0].active);
    }

    #[test]
    fn test_pierce_two_survives_until_third_hit() {
        let mut state = playing_state();
        state.upgrades.pierce = 2;
        let p = projectile_at(&mut state, Vec2::new(100.0, 100.0), Archetype::Normal);
        let hits: Vec<u32> = (0..3)
            .map(|i| hostile_at(&mut state, Vec2::new(100.0 + i as f32, 100.0), 5.0))
            .collect();

        for (n, &h) in hits.iter().enumerate() {
            resolve(
                &mut state,
                &[CollisionEvent::ProjectileHostile {
                    projectile: p,
                    hostile: h,
                }],
            );
            let expect_active = n < 2;
            assert_eq!(state.projectiles[0].active, expect_active, "hit {}", n + 1);
        }
    }

    #[test]
    fn test_exhausted_projectile_ignores_later_events_same_frame() {
        let mut state = playing_state();
        let a = hostile_at(&mut state, Vec2::new(100.0, 100.0), 5.0);
        let b = hostile_at(&mut state, Vec2::new(110.0, 100.0), 5.0);
        let p = projectile_at(&mut state, Vec2::new(105.0, 100.0), Archetype::Normal);

        // Both overlaps were detected in the same frame
        resolve(
            &mut state,
            &[
                CollisionEvent::ProjectileHostile {
                    projectile: p,
                    hostile: a,
                },
                CollisionEvent::ProjectileHostile {
                    projectile: p,
                    hostile: b,
                },
            ],
        );
        // Pierce 0: only the first event lands
        assert_eq!(state.hostiles[0].hp, 4.0);
        assert_eq!(state.hostiles[1].hp, 5.0);
    }

    // ── damage and death payout ──────────────────────────────────────────

    #[test]
    fn test_damage_uses_multiplier() {
        let mut state = playing_state();
        state.upgrades.damage = 1.5;
        let h = hostile_at(&mut state, Vec2::new(100.0, 100.0), 10.0);
        let p = projectile_at(&mut state, Vec2::new(100.0, 100.0), Archetype::Fire);

        resolve(
            &mut state,
            &[CollisionEvent::ProjectileHostile {
                projectile: p,
                hostile: h,
            }],
        );
        // Fire base damage 2.0 x 1.5
        assert_eq!(state.hostiles[0].hp, 7.0);
    }

    #[test]
    fn test_death_pays_out_once() {
        let mut state = playing_state();
        let h = hostile_at(&mut state, Vec2::new(100.0, 100.0), 1.0);

        assert!(damage_hostile_id(&mut state, h, 5.0));
        let score = state.score;
        let kills = state.kills;
        let orbs = state.orbs.len();

        // Hitting the corpse again changes nothing
        assert!(!damage_hostile_id(&mut state, h, 5.0));
        assert_eq!(state.score, score);
        assert_eq!(state.kills, kills);
        assert_eq!(state.orbs.len(), orbs);
    }

    #[test]
    fn test_health_clamped_at_zero() {
        let mut state = playing_state();
        let h = hostile_at(&mut state, Vec2::new(100.0, 100.0), 1.0);
        damage_hostile_id(&mut state, h, 100.0);
        assert_eq!(state.hostiles[0].hp, 0.0);
        assert!(!state.hostiles[0].active);
    }

    #[test]
    fn test_kill_drops_an_orb_with_tier_value() {
        let mut state = playing_state();
        let h = hostile_at(&mut state, Vec2::new(100.0, 100.0), 1.0);
        damage_hostile_id(&mut state, h, 5.0);
        assert_eq!(state.orbs.len(), 1);
        assert_eq!(state.orbs[0].value, HostileTier::Normal.orb_value());
    }

    // ── status effects ───────────────────────────────────────────────────

    #[test]
    fn test_fire_applies_burn_ice_applies_slow() {
        let mut state = playing_state();
        let h1 = hostile_at(&mut state, Vec2::new(100.0, 100.0), 50.0);
        let h2 = hostile_at(&mut state, Vec2::new(300.0, 100.0), 50.0);
        let fire = projectile_at(&mut state, Vec2::new(100.0, 100.0), Archetype::Fire);
        let ice = projectile_at(&mut state, Vec2::new(300.0, 100.0), Archetype::Ice);

        resolve(
            &mut state,
            &[
                CollisionEvent::ProjectileHostile {
                    projectile: fire,
                    hostile: h1,
                },
                CollisionEvent::ProjectileHostile {
                    projectile: ice,
                    hostile: h2,
                },
            ],
        );
        assert!(state.hostiles[0].effects.is_burning());
        assert!(!state.hostiles[0].effects.is_slowed());
        assert!(state.hostiles[1].effects.is_slowed());
        assert!(!state.hostiles[1].effects.is_burning());
    }

    // ── chain lightning ──────────────────────────────────────────────────

    #[test]
    fn test_chain_caps_targets_and_skips_source() {
        let mut state = playing_state();
        let source = hostile_at(&mut state, Vec2::new(400.0, 300.0), 50.0);
        // Five in range, increasing distance
        let in_range: Vec<u32> = (1..=5)
            .map(|i| hostile_at(&mut state, Vec2::new(400.0 + i as f32 * 10.0, 300.0), 50.0))
            .collect();
        // One out of range
        hostile_at(&mut state, Vec2::new(400.0 + CHAIN_RANGE + 50.0, 300.0), 50.0);

        let p = projectile_at(&mut state, Vec2::new(400.0, 300.0), Archetype::Lightning);
        resolve(
            &mut state,
            &[CollisionEvent::ProjectileHostile {
                projectile: p,
                hostile: source,
            }],
        );

        // Source took only the direct hit (base 1.5)
        assert_eq!(state.hostiles[0].hp, 48.5);
        // Nearest three took the arc damage (the damage multiplier, 1.0)
        for (i, &id) in in_range.iter().enumerate() {
            let idx = state.hostile_index(id).unwrap();
            let expected = if i < CHAIN_MAX_TARGETS { 49.0 } else { 50.0 };
            assert_eq!(state.hostiles[idx].hp, expected, "target {i}");
        }
        // One ChainArc event per arc
        let arcs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ChainArc { .. }))
            .count();
        assert_eq!(arcs, CHAIN_MAX_TARGETS);
    }

    // ── splash ───────────────────────────────────────────────────────────

    #[test]
    fn test_splash_linear_falloff() {
        let mut state = playing_state();
        state.upgrades.damage = 1.0;
        // Explosive base damage 3.0; use a raw splash call for exact numbers
        let center = Vec2::new(400.0, 300.0);
        let at_center = hostile_at(&mut state, center, 50.0);
        let halfway = hostile_at(&mut state, center + Vec2::new(25.0, 0.0), 50.0);
        let at_rim = hostile_at(&mut state, center + Vec2::new(SPLASH_RADIUS, 0.0), 50.0);

        splash(&mut state, center, 10.0);

        let hp = |state: &GameState, id| {
            let idx = state.hostile_index(id).unwrap();
            state.hostiles[idx].hp
        };
        assert_eq!(hp(&state, at_center), 40.0);
        assert_eq!(hp(&state, halfway), 45.0);
        // On the rim: outside the (strict) radius, untouched
        assert_eq!(hp(&state, at_rim), 50.0);
    }

    #[test]
    fn test_splash_skips_already_dead() {
        let mut state = playing_state();
        let center = Vec2::new(400.0, 300.0);
        let dead = hostile_at(&mut state, center, 1.0);
        damage_hostile_id(&mut state, dead, 5.0);
        let score = state.score;

        splash(&mut state, center, 10.0);
        assert_eq!(state.score, score);
    }

    // ── avatar interactions ──────────────────────────────────────────────

    #[test]
    fn test_contact_damages_avatar_and_destroys_hostile() {
        let mut state = playing_state();
        let h = hostile_at(&mut state, Vec2::new(400.0, 520.0), 50.0);
        let hp_before = state.hp;

        resolve(&mut state, &[CollisionEvent::AvatarHostile { hostile: h }]);
        assert_eq!(state.hp, hp_before - CONTACT_DAMAGE);
        assert!(!state.hostiles[0].active);
        // No kill payout for contact deaths
        assert_eq!(state.kills, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pickup_heals_and_scores() {
        let mut state = playing_state();
        state.hp = 50.0;
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            pos: Vec2::new(400.0, 520.0),
            radius: PICKUP_RADIUS,
            active: true,
        });

        resolve(&mut state, &[CollisionEvent::AvatarPickup { pickup: id }]);
        assert_eq!(state.hp, 50.0 + PICKUP_HEAL);
        assert_eq!(state.score, PICKUP_SCORE);
        assert!(!state.pickups[0].active);
    }

    #[test]
    fn test_pickup_heal_clamps_to_max() {
        let mut state = playing_state();
        state.hp = state.max_hp - 2.0;
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            pos: Vec2::new(400.0, 520.0),
            radius: PICKUP_RADIUS,
            active: true,
        });
        resolve(&mut state, &[CollisionEvent::AvatarPickup { pickup: id }]);
        assert_eq!(state.hp, state.max_hp);
    }

    #[test]
    fn test_orb_adds_experience() {
        let mut state = playing_state();
        let id = state.next_entity_id();
        state.orbs.push(ExperienceOrb {
            id,
            pos: Vec2::new(400.0, 520.0),
            vel: Vec2::ZERO,
            radius: ORB_RADIUS,
            value: 5,
            active: true,
        });
        resolve(&mut state, &[CollisionEvent::AvatarOrb { orb: id }]);
        assert_eq!(state.experience, 5);
        assert!(!state.orbs[0].active);
    }

    // ── elites ───────────────────────────────────────────────────────────

    #[test]
    fn test_elite_death_scatters_orb_burst() {
        let mut state = playing_state();
        let id = state.next_entity_id();
        state.elites.push(Elite {
            id,
            pos: Vec2::new(400.0, ELITE_PATROL_Y),
            radius: ELITE_RADIUS,
            hp: 1.0,
            max_hp: 1.0,
            phase: ElitePhase::Patrol { dir: 1.0 },
            active: true,
        });

        assert!(damage_elite_id(&mut state, id, 5.0));
        assert_eq!(state.score, ELITE_SCORE);
        assert_eq!(state.orbs.len(), state.tuning.elite_orb_burst as usize);
        assert!(!damage_elite_id(&mut state, id, 5.0));
    }
}
