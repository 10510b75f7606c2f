//! Progression state machine
//!
//! Drives the `Start → Playing ⇄ Upgrade` flow plus the terminal
//! `GameOver`. Two independent triggers pause the loop for an upgrade
//! choice: wave-timer expiry (which also raises difficulty and schedules
//! elites) and the experience threshold. All timing uses the simulation
//! clock, which freezes while the choice is pending.

use serde::{Deserialize, Serialize};

use super::archetype::Archetype;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// A permanent upgrade the player can pick between waves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// +50% projectile damage
    Damage,
    /// +30% projectile speed
    ProjectileSpeed,
    /// +30% fire rate
    FireRate,
    /// One additional projectile per volley
    Multishot,
    /// Pierce through two more hostiles
    Pierce,
    /// +25 max HP and a full heal
    MaxHealth,
    FuseFire,
    FuseIce,
    FuseLightning,
    FuseExplosive,
}

/// Everything an upgrade can be rolled from
pub const UPGRADE_CATALOG: [UpgradeKind; 10] = [
    UpgradeKind::Damage,
    UpgradeKind::ProjectileSpeed,
    UpgradeKind::FireRate,
    UpgradeKind::Multishot,
    UpgradeKind::Pierce,
    UpgradeKind::MaxHealth,
    UpgradeKind::FuseFire,
    UpgradeKind::FuseIce,
    UpgradeKind::FuseLightning,
    UpgradeKind::FuseExplosive,
];

impl UpgradeKind {
    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Power Boost",
            UpgradeKind::ProjectileSpeed => "Swift Balls",
            UpgradeKind::FireRate => "Rapid Fire",
            UpgradeKind::Multishot => "Multi-Shot",
            UpgradeKind::Pierce => "Piercing Shots",
            UpgradeKind::MaxHealth => "Health Boost",
            UpgradeKind::FuseFire => "Fire Ball Fusion",
            UpgradeKind::FuseIce => "Ice Ball Fusion",
            UpgradeKind::FuseLightning => "Lightning Evolution",
            UpgradeKind::FuseExplosive => "Explosive Evolution",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Increase ball damage by 50%",
            UpgradeKind::ProjectileSpeed => "Increase ball speed by 30%",
            UpgradeKind::FireRate => "Increase fire rate by 30%",
            UpgradeKind::Multishot => "Fire an additional ball",
            UpgradeKind::Pierce => "Balls pierce through 2 enemies",
            UpgradeKind::MaxHealth => "Increase max HP by 25 and heal fully",
            UpgradeKind::FuseFire => "Unlock fire balls that deal DoT",
            UpgradeKind::FuseIce => "Unlock ice balls that slow enemies",
            UpgradeKind::FuseLightning => "Unlock lightning that chains to nearby enemies",
            UpgradeKind::FuseExplosive => "Unlock explosive balls with AoE damage",
        }
    }

    /// Mutate the persistent upgrade record (or the equipped archetype)
    pub fn apply(self, state: &mut GameState) {
        match self {
            UpgradeKind::Damage => state.upgrades.damage *= 1.5,
            UpgradeKind::ProjectileSpeed => state.upgrades.projectile_speed *= 1.3,
            UpgradeKind::FireRate => state.upgrades.fire_rate *= 1.3,
            UpgradeKind::Multishot => state.upgrades.multishot += 1,
            UpgradeKind::Pierce => state.upgrades.pierce += 2,
            UpgradeKind::MaxHealth => {
                state.max_hp += 25.0;
                state.hp = state.max_hp;
            }
            UpgradeKind::FuseFire => equip(state, Archetype::Fire),
            UpgradeKind::FuseIce => equip(state, Archetype::Ice),
            UpgradeKind::FuseLightning => equip(state, Archetype::Lightning),
            UpgradeKind::FuseExplosive => equip(state, Archetype::Explosive),
        }
    }
}

fn equip(state: &mut GameState, archetype: Archetype) {
    if let Some(avatar) = &mut state.avatar {
        avatar.archetype = archetype;
    }
}

/// Draw three distinct choices from the catalog
fn draw_choices(state: &mut GameState) -> [UpgradeKind; 3] {
    let picks = rand::seq::index::sample(&mut state.rng, UPGRADE_CATALOG.len(), 3);
    [
        UPGRADE_CATALOG[picks.index(0)],
        UPGRADE_CATALOG[picks.index(1)],
        UPGRADE_CATALOG[picks.index(2)],
    ]
}

/// Pause the loop and present three upgrade choices
pub fn enter_upgrade(state: &mut GameState) {
    let choices = draw_choices(state);
    state.pending_upgrades = Some(choices);
    state.phase = GamePhase::Upgrade;
    state.push_event(GameEvent::UpgradeOffered { choices });
    log::info!(
        "upgrade choice: {} / {} / {}",
        choices[0].name(),
        choices[1].name(),
        choices[2].name()
    );
}

/// Apply the chosen upgrade and resume play. Out-of-range or misphased
/// choices are ignored.
pub fn choose_upgrade(state: &mut GameState, index: usize) {
    if state.phase != GamePhase::Upgrade {
        return;
    }
    let Some(choices) = state.pending_upgrades else {
        return;
    };
    let Some(&choice) = choices.get(index) else {
        return;
    };
    choice.apply(state);
    state.pending_upgrades = None;
    state.phase = GamePhase::Playing;
    log::info!("upgrade applied: {}", choice.name());
}

/// Check thresholds after a frame's combat has resolved
pub fn update(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if state.hp <= 0.0 {
        state.hp = 0.0;
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
        log::info!(
            "game over: score {} at level {}",
            state.score,
            state.level
        );
        return;
    }

    // Wave-timer trigger
    let now = state.now_ms();
    if now - state.wave_started_ms >= WAVE_DURATION_MS {
        state.level += 1;
        state.wave_started_ms = now;
        state.wave_kills = 0;
        log::info!("wave complete, level {}", state.level);
        if state.level % state.tuning.boss_wave_interval == 0 {
            spawn::spawn_elite(state);
            state.push_event(GameEvent::BossSpawned { level: state.level });
        }
        enter_upgrade(state);
        return;
    }

    // Experience trigger
    if state.experience >= state.exp_to_next {
        state.experience -= state.exp_to_next;
        state.exp_to_next = (state.exp_to_next as f32 * EXP_GROWTH).floor() as u32;
        state.player_level += 1;
        state.hp = (state.hp + LEVEL_HEAL).min(state.max_hp);
        state.push_event(GameEvent::LevelUp {
            player_level: state.player_level,
        });
        log::info!("level up: player level {}", state.player_level);
        enter_upgrade(state);
    }
}
